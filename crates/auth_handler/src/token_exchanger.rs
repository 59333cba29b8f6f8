//! Token exchange
//!
//! Runs the GitHub App authentication protocol for one set of credentials:
//!
//! ```text
//! Unstarted -> AppAuthenticated -> InstallationResolved -> TokenIssued
//! ```
//!
//! The first error ends the run; nothing is retried and no partial result is
//! returned.

use async_trait::async_trait;
use github_client::{
    sign_app_jwt, AppAuthToken, InstallationClient, InstallationId, InstallationToken,
};
use secrecy::SecretString;
use tracing::{debug, error, info, instrument};

use crate::{
    credentials::INSTALLATION_LOCATOR_REQUIRED, AuthResult, Credentials, RepositorySlug,
    TokenError, TokenProvider,
};

#[cfg(test)]
#[path = "token_exchanger_tests.rs"]
mod tests;

/// Exchanges a GitHub App identity for an installation access token.
///
/// # Examples
///
/// ```rust,no_run
/// use auth_handler::{CredentialResolver, CredentialSettings, TokenExchanger, TokenProvider};
/// use github_client::GitHubClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = CredentialResolver::new(CredentialSettings {
///     app_id: Some("123456".to_string()),
///     private_key_file: Some("app-key.pem".into()),
///     repository: Some("my-org/my-repo".to_string()),
///     ..Default::default()
/// })
/// .resolve()?;
///
/// let exchanger = TokenExchanger::new(GitHubClient::default());
/// let token = exchanger.get_token(&credentials).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TokenExchanger<C> {
    client: C,
}

impl<C: InstallationClient> TokenExchanger<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Signs the App JWT for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Auth` if the key is malformed or signing fails.
    #[instrument(skip(self, private_key))]
    pub fn sign_app_identity(
        &self,
        app_id: u64,
        private_key: &SecretString,
    ) -> AuthResult<AppAuthToken> {
        sign_app_jwt(app_id, private_key).map_err(|e| TokenError::Auth(e.to_string()))
    }

    /// Returns `installation_id` if given, otherwise looks up the installation
    /// of the App on `repository`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Lookup` if the repository slug is missing or
    /// malformed, or the lookup call fails.
    #[instrument(skip(self, app_jwt))]
    pub async fn resolve_installation_id(
        &self,
        app_jwt: &AppAuthToken,
        installation_id: Option<&InstallationId>,
        repository: Option<&str>,
    ) -> AuthResult<InstallationId> {
        if let Some(installation_id) = installation_id {
            debug!(
                installation_id = %installation_id,
                "Using the configured installation ID"
            );
            return Ok(installation_id.clone());
        }

        let repository = repository
            .ok_or_else(|| TokenError::Lookup(INSTALLATION_LOCATOR_REQUIRED.to_string()))?;
        let slug = RepositorySlug::parse(repository)?;

        let installation = self
            .client
            .find_repository_installation(app_jwt, slug.owner(), slug.name())
            .await
            .map_err(|e| {
                error!(repository = %slug, error = %e, "Installation lookup failed");
                TokenError::Lookup(e.to_string())
            })?;

        Ok(installation.id)
    }

    /// Exchanges the App JWT for an access token scoped to `installation_id`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Auth` if the App JWT has expired or GitHub refuses
    /// to issue the token.
    #[instrument(skip(self, app_jwt))]
    pub async fn exchange_for_installation_token(
        &self,
        app_jwt: &AppAuthToken,
        installation_id: &InstallationId,
    ) -> AuthResult<InstallationToken> {
        if app_jwt.is_expired() {
            return Err(TokenError::Auth(
                "The App JWT expired before the installation token was requested".to_string(),
            ));
        }

        self.client
            .create_installation_token(app_jwt, installation_id)
            .await
            .map_err(|e| {
                error!(installation_id = %installation_id, error = %e, "Token exchange failed");
                TokenError::Auth(e.to_string())
            })
    }
}

#[async_trait]
impl<C: InstallationClient> TokenProvider for TokenExchanger<C> {
    #[instrument(skip(self, credentials), fields(app_id = credentials.app_id()))]
    async fn get_token(&self, credentials: &Credentials) -> AuthResult<SecretString> {
        let app_jwt = self.sign_app_identity(credentials.app_id(), credentials.private_key())?;
        info!(state = "AppAuthenticated", "Signed App JWT");

        let installation_id = self
            .resolve_installation_id(
                &app_jwt,
                credentials.installation_id(),
                credentials.repository(),
            )
            .await?;
        info!(
            state = "InstallationResolved",
            installation_id = %installation_id,
            "Resolved installation"
        );

        let installation_token = self
            .exchange_for_installation_token(&app_jwt, &installation_id)
            .await?;
        info!(
            state = "TokenIssued",
            expires_at = %installation_token.expires_at,
            "Installation token issued"
        );

        Ok(installation_token.token)
    }
}
