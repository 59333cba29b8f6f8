//! get-app-token CLI library exports for testing.
//!
//! This module exposes the command implementations and configuration handling
//! used by the `get-app-token` binary.

pub mod commands;
pub mod config;
pub mod errors;
