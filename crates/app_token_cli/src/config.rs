//! Command-line and environment configuration for the get-app-token CLI.
//!
//! Every input can be given as a flag or through the environment variable the
//! GitHub Action sets. Nothing is marked required at the clap level: missing
//! values are reported by the credential resolver so the messages and their
//! order stay the same however the tool is invoked.

use std::{fmt, path::PathBuf};

use auth_handler::{CredentialResolver, CredentialSettings, Credentials};
use clap::Args;
use github_client::DEFAULT_API_URL;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Inputs needed to issue an installation token.
#[derive(Args, Clone, Default)]
pub struct TokenArgs {
    /// GitHub App ID. Or set 'APP_ID' environment variable
    #[arg(short = 'a', long = "app-id", env = "APP_ID", global = true)]
    pub app_id: Option<String>,

    /// GitHub App private key in PEM format (takes precedence over
    /// 'private-key-file'). Or set 'PRIVATE_KEY' environment variable
    #[arg(
        short = 'p',
        long = "private-key",
        env = "PRIVATE_KEY",
        hide_env_values = true,
        global = true
    )]
    pub private_key: Option<String>,

    /// Path to the GitHub App private key file. Or set 'PRIVATE_KEY_FILE'
    /// environment variable
    #[arg(
        short = 'f',
        long = "private-key-file",
        env = "PRIVATE_KEY_FILE",
        global = true
    )]
    pub private_key_file: Option<PathBuf>,

    /// Installation ID of the GitHub App. Or set 'INSTALLATION_ID'
    /// environment variable
    #[arg(
        short = 'i',
        long = "installation-id",
        env = "INSTALLATION_ID",
        global = true
    )]
    pub installation_id: Option<String>,

    /// Repository ('owner/repo') the App is installed on, used to look up the
    /// installation when no installation ID is given. Or set
    /// 'GITHUB_REPOSITORY' environment variable
    #[arg(
        short = 'r',
        long = "repository",
        env = "GITHUB_REPOSITORY",
        global = true
    )]
    pub repository: Option<String>,

    /// Base URL of the GitHub REST API. Or set 'GITHUB_API_URL' environment
    /// variable
    #[arg(long = "api-url", env = "GITHUB_API_URL", global = true)]
    pub api_url: Option<String>,
}

impl TokenArgs {
    /// The GitHub API base URL, falling back to github.com when unset or blank.
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Converts the arguments into raw credential settings.
    ///
    /// The private key file is passed on unread; the resolver loads it once
    /// the other values have been validated.
    pub fn to_settings(&self) -> CredentialSettings {
        CredentialSettings {
            app_id: self.app_id.clone(),
            private_key: self
                .private_key
                .as_ref()
                .map(|key| SecretString::from(key.clone())),
            private_key_file: self.private_key_file.clone(),
            installation_id: self.installation_id.clone(),
            repository: self.repository.clone(),
        }
    }

    /// Validates the settings into [`Credentials`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Token` with the first failing validation, including an
    /// unreadable private key file.
    #[instrument(skip(self))]
    pub fn resolve_credentials(&self) -> Result<Credentials, Error> {
        debug!(
            key_file = ?self.private_key_file,
            "Resolving credentials from arguments"
        );
        Ok(CredentialResolver::new(self.to_settings()).resolve()?)
    }
}

impl fmt::Debug for TokenArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenArgs")
            .field("app_id", &self.app_id)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<REDACTED>"),
            )
            .field("private_key_file", &self.private_key_file)
            .field("installation_id", &self.installation_id)
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .finish()
    }
}
