//! Crate for the GitHub REST calls needed to turn a GitHub App identity into an
//! installation access token.
//!
//! Three pieces are provided:
//! - [`sign_app_jwt`] signs the App JWT from the App ID and private key.
//! - [`InstallationClient`] is the seam for the two REST calls that use it:
//!   finding the installation of a repository and creating an installation
//!   access token.
//! - [`GitHubClient`] implements [`InstallationClient`] on top of octocrab.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

pub mod app_jwt;
pub use app_jwt::{sign_app_jwt, AppAuthToken};

pub mod errors;
pub use errors::Error;

pub mod installation;
pub use installation::{Account, Installation, InstallationId, InstallationToken};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connect and read timeout applied to every GitHub API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The REST operations that require an App JWT.
///
/// Implemented by [`GitHubClient`] for real traffic; tests substitute their own
/// implementation to observe which calls are made.
#[async_trait]
pub trait InstallationClient: Send + Sync {
    /// Finds the installation of the App on the repository `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FailedToFindAppInstallation` if GitHub answers with a
    /// non-success status, the request cannot be sent, or the response cannot
    /// be decoded.
    async fn find_repository_installation(
        &self,
        app_jwt: &AppAuthToken,
        owner: &str,
        repo: &str,
    ) -> Result<Installation, Error>;

    /// Creates an access token scoped to the installation `installation_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FailedToCreateAccessToken` if GitHub rejects the request
    /// (unknown installation, suspended App, invalid JWT) or the response
    /// cannot be decoded.
    async fn create_installation_token(
        &self,
        app_jwt: &AppAuthToken,
        installation_id: &InstallationId,
    ) -> Result<InstallationToken, Error>;
}

/// Body of a successful `POST /app/installations/{id}/access_tokens`.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

/// A client for the GitHub API endpoints used while authenticating as an App.
///
/// An octocrab client is built for each request with the App JWT as bearer
/// token, so a `GitHubClient` holds no credentials itself.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_url: String,
    timeout: Duration,
}

impl GitHubClient {
    /// Creates a client for the GitHub API at `api_url`.
    ///
    /// Use [`DEFAULT_API_URL`] for github.com, or the `/api/v3` URL of a GitHub
    /// Enterprise Server instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidApiUrl` if `api_url` is not an absolute http(s) URL.
    pub fn new(api_url: &str) -> Result<Self, Error> {
        let trimmed = api_url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(trimmed).map_err(|e| {
            error!(api_url = trimmed, error = %e, "Failed to parse GitHub API URL");
            Error::InvalidApiUrl(trimmed.to_string())
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(trimmed.to_string()));
        }

        Ok(Self {
            api_url: trimmed.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Overrides the per-request connect and read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn app_client(&self, app_jwt: &AppAuthToken) -> Result<Octocrab, Error> {
        create_token_client(&app_jwt.token, &self.api_url, self.timeout)
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[async_trait]
impl InstallationClient for GitHubClient {
    #[instrument(skip(self, app_jwt), fields(owner = %owner, repo = %repo))]
    async fn find_repository_installation(
        &self,
        app_jwt: &AppAuthToken,
        owner: &str,
        repo: &str,
    ) -> Result<Installation, Error> {
        let client = self.app_client(app_jwt)?;

        let path = format!("/repos/{}/{}/installation", owner, repo);
        debug!("Making API call to: {}", path);
        let result: OctocrabResult<Installation> = client.get(path, None::<&()>).await;

        match result {
            Ok(installation) => {
                info!(
                    owner = owner,
                    repo = repo,
                    installation_id = %installation.id,
                    "Found App installation for repository"
                );
                Ok(installation)
            }
            Err(e) => {
                error!(
                    owner = owner,
                    repo = repo,
                    "No installation found for repository - the GitHub App may not be installed on it"
                );
                log_octocrab_error("Failed to find repository installation", e);
                Err(Error::FailedToFindAppInstallation(
                    owner.to_string(),
                    repo.to_string(),
                ))
            }
        }
    }

    #[instrument(skip(self, app_jwt), fields(installation_id = %installation_id))]
    async fn create_installation_token(
        &self,
        app_jwt: &AppAuthToken,
        installation_id: &InstallationId,
    ) -> Result<InstallationToken, Error> {
        let client = self.app_client(app_jwt)?;

        let path = format!("/app/installations/{}/access_tokens", installation_id);
        debug!("Making API call to: {}", path);
        let result: OctocrabResult<AccessTokenResponse> =
            client.post(path, None::<&()>).await;

        match result {
            Ok(response) => {
                info!(
                    installation_id = %installation_id,
                    expires_at = %response.expires_at,
                    "Created access token for installation"
                );
                Ok(InstallationToken {
                    token: SecretString::from(response.token),
                    expires_at: response.expires_at,
                })
            }
            Err(e) => {
                error!(
                    installation_id = %installation_id,
                    "Failed to create a token for the installation"
                );
                log_octocrab_error("Failed to create installation access token", e);
                Err(Error::FailedToCreateAccessToken(installation_id.to_string()))
            }
        }
    }
}

/// Creates an `Octocrab` client that sends `token` as its bearer credential.
///
/// # Errors
///
/// Returns `Error::InvalidApiUrl` if `api_url` is not a valid URI, or
/// `Error::AuthError` if the client cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(
    token: &SecretString,
    api_url: &str,
    timeout: Duration,
) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .base_uri(api_url)
        .map_err(|e| {
            error!(api_url = api_url, error = %e, "Failed to use GitHub API URL");
            Error::InvalidApiUrl(api_url.to_string())
        })?
        .personal_token(token.expose_secret().to_string())
        .set_connect_timeout(Some(timeout))
        .set_read_timeout(Some(timeout))
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build Octocrab client");
            Error::AuthError("Failed to build the GitHub API client.".to_string())
        })
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => error!(
            error_message = source.message,
            documentation_url = source.documentation_url.as_deref().unwrap_or(""),
            backtrace = backtrace.to_string(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
