//! GitHub Actions integration.
//!
//! Uses the workflow command protocol on stdout (`::add-mask::`, `::error::`)
//! and the `GITHUB_OUTPUT` file to publish the token as the `app_token` step
//! output.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use auth_handler::{Credentials, TokenProvider};
use clap::Args;
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "action_cmd_tests.rs"]
mod tests;

/// Name of the step output that receives the token.
pub const OUTPUT_NAME: &str = "app_token";

/// Arguments of the `for-gh-action` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ActionArgs {
    /// File that step outputs are appended to. Set by the runner.
    #[arg(long = "github-output", env = "GITHUB_OUTPUT", hide = true)]
    pub github_output: Option<PathBuf>,
}

/// Acquires a token, masks it in the workflow log and, when the runner
/// provides an output file, records it as the `app_token` step output.
///
/// # Errors
///
/// Returns `Error::Token` if acquisition fails, or `Error::WriteOutput` if
/// stdout or the output file cannot be written.
#[instrument(skip(provider, credentials, out))]
pub async fn execute(
    provider: &dyn TokenProvider,
    credentials: &Credentials,
    args: &ActionArgs,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let token = provider.get_token(credentials).await?;
    let token = token.expose_secret();

    writeln!(out, "::add-mask::{}", token).map_err(Error::WriteOutput)?;

    match args.github_output.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => set_output(path, OUTPUT_NAME, token)?,
        _ => debug!("GITHUB_OUTPUT is not set, skipping step output"),
    }

    writeln!(out, "Token generated successfully: 🔑").map_err(Error::WriteOutput)?;
    out.flush().map_err(Error::WriteOutput)?;

    info!("Token generated successfully");
    Ok(())
}

/// Formats an error as a workflow `error` command so the runner annotates the
/// failed step with it.
pub fn error_command(error: &Error) -> String {
    let message = error
        .to_string()
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", message)
}

fn set_output(path: &Path, name: &str, value: &str) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::WriteOutput)?;

    writeln!(file, "{}={}", name, value).map_err(Error::WriteOutput)
}
