//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur while authenticating as a
//! GitHub App and exchanging the App identity for an installation access token.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// The octocrab error that caused a failure is logged where it happens and then
/// collapsed into one of these variants, so callers only deal with the stage
/// that failed.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.find_repository_installation(&app_jwt, "octo-org", "octo-repo").await {
///     Ok(installation) => println!("Installation: {}", installation.id),
///     Err(Error::FailedToFindAppInstallation(owner, repo)) => {
///         eprintln!("App is not installed on {owner}/{repo}")
///     }
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Signing the App JWT or building the GitHub client failed.
    ///
    /// This error occurs when:
    /// - The private key is not a valid RSA key in PEM format
    /// - The JWT cannot be encoded
    /// - The HTTP client cannot be constructed
    ///
    /// The contained string provides specific details about the failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Failed to create an installation access token.
    ///
    /// GitHub rejected the token request. Common causes include:
    /// - The installation does not exist or was removed
    /// - The App was suspended or its key revoked
    /// - The App JWT expired or was signed with the wrong key
    ///
    /// Parameters: (installation_id)
    #[error("Failed to create an installation access token for installation: {0}")]
    FailedToCreateAccessToken(String),

    /// Failed to find the App installation for a repository.
    ///
    /// This typically means the App is not installed on the repository or its
    /// owner, or the repository does not exist.
    ///
    /// Parameters: (owner, repository)
    #[error("Failed to find installation for repository: {0}/{1}")]
    FailedToFindAppInstallation(String, String),

    /// The API base URL could not be parsed.
    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),

    /// An installation ID was not a positive decimal number.
    #[error("Invalid installation ID: '{0}'")]
    InvalidInstallationId(String),
}
