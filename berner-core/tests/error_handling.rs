use berner_core::{
    exit_codes, ConfigError, CoreError, Credentials, ErrorExt, ErrorReporter, RedditApiError,
    StorageError, TokenPair,
};
use std::path::PathBuf;

#[test]
fn test_error_codes() {
    let reddit_error = CoreError::RedditApi(RedditApiError::AuthorizationTimeout { seconds: 300 });
    assert_eq!(reddit_error.error_code(), "REDDIT_API");

    let storage_error = CoreError::Storage(StorageError::CredentialStoreMissing {
        path: PathBuf::from("config/RedditBerner.config.json"),
    });
    assert_eq!(storage_error.error_code(), "STORAGE");

    let config_error = CoreError::Config(ConfigError::EmptyScriptLibrary {
        dir: PathBuf::from("scripts"),
        max_bytes: 10_000,
    });
    assert_eq!(config_error.error_code(), "CONFIG");
}

#[test]
fn test_token_error_codes() {
    assert_eq!(
        RedditApiError::MissingAccessToken.error_code(),
        "REDDIT_MISSING_ACCESS_TOKEN"
    );
    assert_eq!(
        RedditApiError::MissingRefreshToken.error_code(),
        "REDDIT_MISSING_REFRESH_TOKEN"
    );
    assert_eq!(RedditApiError::InvalidToken.error_code(), "REDDIT_INVALID_TOKEN");

    let missing_access = CoreError::RedditApi(RedditApiError::MissingAccessToken);
    assert_eq!(missing_access.exit_code(), exit_codes::NO_PERM);
    assert!(missing_access
        .user_friendly_message()
        .contains("did not return an access token"));

    let rejected = CoreError::RedditApi(RedditApiError::InvalidToken);
    assert_eq!(rejected.exit_code(), exit_codes::NO_PERM);
    assert!(rejected.user_friendly_message().contains("re-authorize"));
}

#[test]
fn test_exit_codes() {
    let timeout = CoreError::RedditApi(RedditApiError::AuthorizationTimeout { seconds: 300 });
    assert_eq!(timeout.exit_code(), exit_codes::TEMP_FAIL);

    let corrupt = CoreError::Storage(StorageError::CredentialStoreCorrupt {
        path: PathBuf::from("config/RedditBerner.config.json"),
        details: "expected value at line 1 column 1".to_string(),
    });
    assert_eq!(corrupt.exit_code(), exit_codes::CONFIG);

    let empty = CoreError::Config(ConfigError::EmptySubredditList {
        path: PathBuf::from("config/subreddits.json"),
    });
    assert_eq!(empty.exit_code(), exit_codes::CONFIG);
}

#[test]
fn test_user_friendly_messages() {
    let timeout = CoreError::RedditApi(RedditApiError::AuthorizationTimeout { seconds: 300 });
    let message = timeout.user_friendly_message();
    assert!(message.contains("Unable to authorize Reddit"));
    assert!(message.contains("300"));

    let empty_scripts = CoreError::Config(ConfigError::EmptyScriptLibrary {
        dir: PathBuf::from("scripts"),
        max_bytes: 10_000,
    });
    let message = empty_scripts.user_friendly_message();
    assert!(message.contains("No suitable scripts found"));
    assert!(message.contains("10000"));
}

#[test]
fn test_credentials_debug_redacts_tokens() {
    let credentials = Credentials::new(
        "app",
        TokenPair::new("secret-access", "secret-refresh"),
    );
    let rendered = format!("{:?}", credentials);
    assert!(rendered.contains("app"));
    assert!(!rendered.contains("secret-access"));
    assert!(!rendered.contains("secret-refresh"));
}

#[test]
fn test_credentials_accept_legacy_field_names() {
    let legacy = r#"{"AppId":"z8huXvY0aph0PQ","AccessToken":"a","RefreshToken":"r"}"#;
    let credentials: Credentials = serde_json::from_str(legacy).unwrap();
    assert_eq!(credentials.app_id, "z8huXvY0aph0PQ");
    assert!(credentials.has_refresh_token());

    let written = serde_json::to_string(&credentials).unwrap();
    assert!(written.contains("\"refreshToken\":\"r\""));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::RedditApi(RedditApiError::MissingRefreshToken);

    reporter.report_error(&error);
    reporter.report_warning(&error);
    assert_eq!(reporter.report_fatal(&error), exit_codes::NO_PERM);
}
