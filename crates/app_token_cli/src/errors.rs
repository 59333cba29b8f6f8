use std::io;

use auth_handler::TokenError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the get-app-token CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Token acquisition failed.
    ///
    /// The message is the one produced by the failing stage, unchanged, so
    /// scripts can match on it.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The GitHub API client could not be set up, for example because the
    /// API URL is invalid.
    #[error(transparent)]
    Client(#[from] github_client::Error),

    /// Failed to write the token to stdout or to the GitHub Actions output file.
    #[error("Failed to write output: {0}")]
    WriteOutput(io::Error),
}
