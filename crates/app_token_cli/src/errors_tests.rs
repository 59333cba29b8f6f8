use super::*;
use std::io;

#[test]
fn test_token_error_is_transparent() {
    let error = Error::from(TokenError::Config("APP_ID is required".to_string()));
    assert_eq!(error.to_string(), "APP_ID is required");
}

#[test]
fn test_client_error_is_transparent() {
    let error = Error::from(github_client::Error::InvalidApiUrl("nope".to_string()));
    assert_eq!(error.to_string(), "Invalid GitHub API URL: nope");
}

#[test]
fn test_write_output_error_display() {
    let error = Error::WriteOutput(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
    assert_eq!(error.to_string(), "Failed to write output: broken pipe");
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
