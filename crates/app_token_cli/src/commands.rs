//! Command modules for the get-app-token CLI.
//!
//! - `token_cmd`: prints the token, for local use and scripts
//! - `action_cmd`: masks the token and sets the GitHub Actions step output

pub mod action_cmd;
pub mod token_cmd;
