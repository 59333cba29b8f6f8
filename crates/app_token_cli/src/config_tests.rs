use super::*;
use auth_handler::TokenError;
use secrecy::ExposeSecret;
use std::fs;
use tempfile::TempDir;

fn args() -> TokenArgs {
    TokenArgs {
        app_id: Some("123456".to_string()),
        installation_id: Some("42".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_api_url_defaults_to_github_com() {
    assert_eq!(TokenArgs::default().api_url(), "https://api.github.com");

    let blank = TokenArgs {
        api_url: Some("  ".to_string()),
        ..Default::default()
    };
    assert_eq!(blank.api_url(), "https://api.github.com");
}

#[test]
fn test_api_url_override() {
    let args = TokenArgs {
        api_url: Some("https://github.example.com/api/v3".to_string()),
        ..Default::default()
    };
    assert_eq!(args.api_url(), "https://github.example.com/api/v3");
}

#[test]
fn test_to_settings_passes_inline_key_and_key_file() {
    let args = TokenArgs {
        private_key: Some("inline-key".to_string()),
        private_key_file: Some(PathBuf::from("/does/not/exist.pem")),
        ..args()
    };

    let settings = args.to_settings();

    assert_eq!(
        settings.private_key.as_ref().map(|k| k.expose_secret()),
        Some("inline-key")
    );
    assert_eq!(
        settings.private_key_file,
        Some(PathBuf::from("/does/not/exist.pem"))
    );
    assert_eq!(settings.app_id.as_deref(), Some("123456"));
    assert_eq!(settings.installation_id.as_deref(), Some("42"));
}

#[test]
fn test_resolve_credentials_reads_private_key_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let key_path = temp_dir.path().join("app.pem");
    fs::write(&key_path, "file-key\n").expect("Failed to write key file");

    let args = TokenArgs {
        private_key: Some("   ".to_string()),
        private_key_file: Some(key_path),
        ..args()
    };

    let credentials = args
        .resolve_credentials()
        .expect("credentials should resolve");

    assert_eq!(credentials.private_key().expose_secret(), "file-key\n");
}

#[test]
fn test_resolve_credentials_missing_private_key_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.pem");

    let args = TokenArgs {
        private_key_file: Some(missing),
        ..args()
    };

    match args.resolve_credentials() {
        Err(Error::Token(TokenError::Config(msg))) => {
            assert!(msg.starts_with("Failed to read the private key file"));
            assert!(msg.contains("missing.pem"));
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_resolve_credentials_reports_missing_app_id_before_reading_key_file() {
    let args = TokenArgs {
        private_key_file: Some(PathBuf::from("/nonexistent/key.pem")),
        installation_id: Some("42".to_string()),
        ..Default::default()
    };

    match args.resolve_credentials() {
        Err(Error::Token(TokenError::Config(msg))) => assert_eq!(msg, "APP_ID is required"),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_to_settings_without_private_key() {
    let settings = args().to_settings();
    assert!(settings.private_key.is_none());
    assert!(settings.private_key_file.is_none());
}

#[test]
fn test_resolve_credentials_reports_first_missing_value() {
    let result = TokenArgs::default().resolve_credentials();

    match result {
        Err(Error::Token(TokenError::Config(msg))) => assert_eq!(msg, "APP_ID is required"),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_resolve_credentials_success() {
    let args = TokenArgs {
        private_key: Some("inline-key".to_string()),
        repository: Some("fake-org/fake-github-repository".to_string()),
        installation_id: None,
        ..args()
    };

    let credentials = args.resolve_credentials().expect("credentials should resolve");

    assert_eq!(credentials.app_id(), 123456);
    assert_eq!(
        credentials.repository(),
        Some("fake-org/fake-github-repository")
    );
}

#[test]
fn test_debug_output_redacts_private_key() {
    let args = TokenArgs {
        private_key: Some("super-secret-key".to_string()),
        ..args()
    };

    let debug_output = format!("{:?}", args);
    assert!(debug_output.contains("<REDACTED>"));
    assert!(!debug_output.contains("super-secret-key"));
}
