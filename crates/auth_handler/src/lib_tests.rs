use super::*;

#[test]
fn test_config_error_message_is_verbatim() {
    let error = TokenError::Config("APP_ID is required".to_string());
    assert_eq!(error.to_string(), "APP_ID is required");
}

#[test]
fn test_auth_error_message_is_verbatim() {
    let error = TokenError::Auth("bad credentials".to_string());
    assert_eq!(error.to_string(), "bad credentials");
}

#[test]
fn test_lookup_error_message_is_verbatim() {
    let error = TokenError::Lookup("not installed".to_string());
    assert_eq!(error.to_string(), "not installed");
}

#[test]
fn test_error_variants_are_distinguishable() {
    let message = "same text".to_string();
    assert_ne!(
        TokenError::Config(message.clone()),
        TokenError::Auth(message.clone())
    );
    assert_ne!(TokenError::Auth(message.clone()), TokenError::Lookup(message));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenError>();
}
