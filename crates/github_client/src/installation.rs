//! GitHub App installation domain types.
//!
//! This module contains types related to GitHub App installations: the
//! installation returned by a repository lookup, the identifier used to address
//! an installation, and the access token issued for it.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;

/// Represents a GitHub account (user or organization).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: u64,
    /// The login name of the account
    pub login: String,
    /// The type of account (User or Organization)
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Represents a GitHub App installation as returned by
/// `GET /repos/{owner}/{repo}/installation`.
///
/// Only the fields this crate reads are modelled; everything else in the
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Installation {
    /// The unique ID of the installation
    pub id: InstallationId,
    /// The ID of the App this installation belongs to
    #[serde(default)]
    pub app_id: Option<u64>,
    /// The account (user or organization) where the app is installed
    #[serde(default)]
    pub account: Option<Account>,
    /// Either "all" or "selected"
    #[serde(default)]
    pub repository_selection: Option<String>,
}

/// Identifier of a GitHub App installation.
///
/// Stored as its decimal text so that an ID supplied by the user is forwarded
/// exactly as given, even when it does not fit in 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallationId(String);

impl InstallationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for InstallationId {
    type Err = Error;

    /// Parses a run of ASCII digits with a non-zero value. Surrounding
    /// whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let is_digits = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
        if !is_digits || value.bytes().all(|b| b == b'0') {
            return Err(Error::InvalidInstallationId(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }
}

/// Reads the ID from a JSON number, keeping its exact decimal text.
impl<'de> Deserialize<'de> for InstallationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        number.to_string().parse().map_err(de::Error::custom)
    }
}

impl From<u64> for InstallationId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An installation access token.
///
/// The token is a secret; its `Debug` output is redacted. GitHub decides the
/// lifetime, typically one hour.
#[derive(Debug)]
pub struct InstallationToken {
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}
