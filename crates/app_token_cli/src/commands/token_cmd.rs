//! Prints an installation token on stdout.

use std::io::Write;

use auth_handler::{Credentials, TokenProvider};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "token_cmd_tests.rs"]
mod tests;

/// Acquires a token for `credentials` and writes it to `out` followed by a
/// newline. Nothing is written if acquisition fails.
///
/// # Errors
///
/// Returns `Error::Token` if acquisition fails, or `Error::WriteOutput` if
/// `out` cannot be written.
#[instrument(skip_all)]
pub async fn execute(
    provider: &dyn TokenProvider,
    credentials: &Credentials,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let token = provider.get_token(credentials).await?;

    writeln!(out, "{}", token.expose_secret()).map_err(Error::WriteOutput)?;
    out.flush().map_err(Error::WriteOutput)?;

    info!("Token written to stdout");
    Ok(())
}
