//! Credential resolution
//!
//! Turns raw configuration values into validated [`Credentials`].

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use github_client::InstallationId;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::{AuthResult, TokenError};

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;

pub const APP_ID_REQUIRED: &str = "APP_ID is required";
pub const PRIVATE_KEY_REQUIRED: &str = "PRIVATE_KEY is required";
pub const INSTALLATION_LOCATOR_REQUIRED: &str = "INSTALLATION_ID or GITHUB_REPOSITORY is required";
pub const INSTALLATION_ID_INVALID: &str = "INSTALLATION_ID must be a positive integer";

/// Raw, unvalidated configuration as supplied by the caller.
///
/// Empty and whitespace-only values count as missing. The private key file is
/// only read when no private key is given directly, and only after every
/// other check has passed.
#[derive(Default)]
pub struct CredentialSettings {
    pub app_id: Option<String>,
    pub private_key: Option<SecretString>,
    pub private_key_file: Option<PathBuf>,
    pub installation_id: Option<String>,
    pub repository: Option<String>,
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("app_id", &self.app_id)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<REDACTED>"),
            )
            .field("private_key_file", &self.private_key_file)
            .field("installation_id", &self.installation_id)
            .field("repository", &self.repository)
            .finish()
    }
}

/// Validated credentials for one token acquisition.
///
/// Holds an App ID, a private key, and at least one of an installation ID or a
/// repository slug.
pub struct Credentials {
    app_id: u64,
    private_key: SecretString,
    installation_id: Option<InstallationId>,
    repository: Option<String>,
}

impl Credentials {
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn private_key(&self) -> &SecretString {
        &self.private_key
    }

    pub fn installation_id(&self) -> Option<&InstallationId> {
        self.installation_id.as_ref()
    }

    /// The `owner/repo` slug, exactly as configured (trimmed).
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .field("installation_id", &self.installation_id)
            .field("repository", &self.repository)
            .finish()
    }
}

/// Validates [`CredentialSettings`].
///
/// The checks run in a fixed order and the first failure is returned, so the
/// reported message is stable for a given input:
///
/// 1. App ID present and a non-zero integer
/// 2. Private key or private key file present
/// 3. Installation ID or repository present
/// 4. Installation ID, when present, is a positive integer
/// 5. Private key file, when used, is readable
///
/// # Examples
///
/// ```rust
/// use auth_handler::{CredentialResolver, CredentialSettings};
///
/// let settings = CredentialSettings {
///     app_id: Some("123456".to_string()),
///     installation_id: Some("42".to_string()),
///     ..Default::default()
/// };
///
/// let error = CredentialResolver::new(settings).resolve().unwrap_err();
/// assert_eq!(error.to_string(), "PRIVATE_KEY is required");
/// ```
#[derive(Debug)]
pub struct CredentialResolver {
    settings: CredentialSettings,
}

impl CredentialResolver {
    pub fn new(settings: CredentialSettings) -> Self {
        Self { settings }
    }

    /// Produces validated [`Credentials`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Config` with the message of the first failing check.
    #[instrument(skip(self))]
    pub fn resolve(&self) -> AuthResult<Credentials> {
        let app_id = non_blank(self.settings.app_id.as_deref())
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value != 0)
            .ok_or_else(|| TokenError::Config(APP_ID_REQUIRED.to_string()))?;

        let inline_key = non_blank(
            self.settings
                .private_key
                .as_ref()
                .map(|key| key.expose_secret()),
        );
        let key_file = self
            .settings
            .private_key_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());
        if inline_key.is_none() && key_file.is_none() {
            return Err(TokenError::Config(PRIVATE_KEY_REQUIRED.to_string()));
        }

        let installation_id = non_blank(self.settings.installation_id.as_deref());
        let repository = non_blank(self.settings.repository.as_deref());
        if installation_id.is_none() && repository.is_none() {
            return Err(TokenError::Config(
                INSTALLATION_LOCATOR_REQUIRED.to_string(),
            ));
        }

        let installation_id = installation_id
            .map(InstallationId::from_str)
            .transpose()
            .map_err(|_| TokenError::Config(INSTALLATION_ID_INVALID.to_string()))?;

        let private_key = match (inline_key, key_file) {
            (Some(key), _) => SecretString::from(key.to_string()),
            (None, Some(path)) => read_private_key_file(path)?,
            (None, None) => return Err(TokenError::Config(PRIVATE_KEY_REQUIRED.to_string())),
        };

        debug!(
            app_id = app_id,
            installation_id = ?installation_id,
            repository = ?repository,
            "Resolved credentials"
        );

        Ok(Credentials {
            app_id,
            private_key,
            installation_id,
            repository: repository.map(str::to_string),
        })
    }
}

fn read_private_key_file(path: &Path) -> AuthResult<SecretString> {
    debug!(path = ?path, "Reading private key file");
    let key = fs::read_to_string(path).map_err(|e| {
        TokenError::Config(format!(
            "Failed to read the private key file {:?}: {}",
            path, e
        ))
    })?;

    if key.trim().is_empty() {
        return Err(TokenError::Config(PRIVATE_KEY_REQUIRED.to_string()));
    }
    Ok(SecretString::from(key))
}

/// A repository slug split into owner and repository name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Splits `slug` on its first `/`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Lookup` if there is no `/`, either side is empty, or
    /// the name contains another `/`.
    pub fn parse(slug: &str) -> AuthResult<Self> {
        let malformed = || {
            TokenError::Lookup(format!(
                "GITHUB_REPOSITORY must be in the form 'owner/repo', got '{}'",
                slug
            ))
        };

        let (owner, name) = slug.trim().split_once('/').ok_or_else(malformed)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
