//! GitHub App installation token acquisition.
//!
//! This crate turns raw configuration into a GitHub App installation access
//! token:
//!
//! 1. [`CredentialResolver`] validates the raw settings and produces
//!    [`Credentials`], failing on the first missing value.
//! 2. [`TokenExchanger`] signs the App JWT, resolves the installation ID (given
//!    directly or looked up from `owner/repo`) and exchanges the JWT for an
//!    installation access token.
//!
//! ## Architecture
//!
//! The GitHub REST calls sit behind [`github_client::InstallationClient`], so the
//! exchange logic can be exercised without network access. Callers that only
//! need "credentials in, token out" depend on [`TokenProvider`].
//!
//! ## Errors
//!
//! Every failure is a [`TokenError`] whose message is surfaced verbatim. The
//! variant tells configuration mistakes apart from authentication and lookup
//! failures; nothing is retried.

use async_trait::async_trait;
use secrecy::SecretString;

mod credentials;
mod token_exchanger;

pub use credentials::{
    CredentialResolver, CredentialSettings, Credentials, RepositorySlug, APP_ID_REQUIRED,
    INSTALLATION_ID_INVALID, INSTALLATION_LOCATOR_REQUIRED, PRIVATE_KEY_REQUIRED,
};
pub use token_exchanger::TokenExchanger;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Result type for token acquisition operations
pub type AuthResult<T> = std::result::Result<T, TokenError>;

/// Errors that can occur while acquiring an installation token.
///
/// The message of each variant is exactly the text it carries.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Missing or invalid input. Indicates a usage or setup mistake.
    #[error("{0}")]
    Config(String),

    /// The App JWT could not be signed, or GitHub refused to issue the
    /// installation token.
    #[error("{0}")]
    Auth(String),

    /// The repository slug is malformed or the installation lookup failed.
    #[error("{0}")]
    Lookup(String),
}

/// Issues installation tokens for validated credentials.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquires an installation access token for `credentials`.
    ///
    /// # Errors
    ///
    /// Returns the `TokenError` of the first stage that failed.
    async fn get_token(&self, credentials: &Credentials) -> AuthResult<SecretString>;
}
