//! Signing of the JSON Web Token that identifies a GitHub App.
//!
//! The App JWT is only used to call the `/app/...` and installation lookup
//! endpoints. GitHub rejects App JWTs with a lifetime over ten minutes, so the
//! token is kept well below that and back-dated a little to allow for clock
//! drift between this machine and GitHub.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::Error;

#[cfg(test)]
#[path = "app_jwt_tests.rs"]
mod tests;

/// Seconds the `iat` claim is moved into the past.
pub const ISSUED_AT_DRIFT_SECS: i64 = 60;

/// Seconds from now until the App JWT expires.
pub const APP_JWT_LIFETIME_SECS: i64 = 9 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct JWTClaims {
    iat: u64,
    exp: u64,
    iss: u64,
}

/// A signed App JWT together with the moment it stops being accepted.
#[derive(Debug)]
pub struct AppAuthToken {
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl AppAuthToken {
    /// Returns `true` once the token has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Signs an RS256 JWT asserting the identity of the GitHub App `app_id`.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App, used as the `iss` claim.
/// * `private_key` - The App's RSA private key in PEM format (PKCS#1 or PKCS#8).
///
/// # Errors
///
/// Returns `Error::AuthError` if the key cannot be parsed, the system clock is
/// before the Unix epoch, or encoding fails.
#[instrument(skip(private_key))]
pub fn sign_app_jwt(app_id: u64, private_key: &SecretString) -> Result<AppAuthToken, Error> {
    let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let now = Utc::now();
    let issued_at = now - Duration::seconds(ISSUED_AT_DRIFT_SECS);
    let expires_at = now + Duration::seconds(APP_JWT_LIFETIME_SECS);

    let claims = JWTClaims {
        iat: unix_seconds(issued_at)?,
        exp: unix_seconds(expires_at)?,
        iss: app_id,
    };

    let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| {
        error!(app_id = app_id, error = %e, "Failed to sign the App JWT");
        Error::AuthError(format!("Failed to sign the App JWT. Error was: {}", e))
    })?;

    debug!(app_id = app_id, expires_at = %expires_at, "Signed App JWT");

    Ok(AppAuthToken {
        token: SecretString::from(token),
        expires_at,
    })
}

fn unix_seconds(instant: DateTime<Utc>) -> Result<u64, Error> {
    u64::try_from(instant.timestamp()).map_err(|_| {
        Error::AuthError("The system clock is set before the Unix epoch".to_string())
    })
}
