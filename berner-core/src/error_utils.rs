use crate::error::*;
use tracing::{error, info, warn};

/// Process exit codes, loosely following BSD `sysexits.h`.
pub mod exit_codes {
    pub const SOFTWARE: u8 = 70;
    pub const IO: u8 = 74;
    pub const TEMP_FAIL: u8 = 75;
    pub const NO_PERM: u8 = 77;
    pub const CONFIG: u8 = 78;
}

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
    fn exit_code(&self) -> u8;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::RedditApi(e) => {
                error!("Reddit API error details: {:?}", e);
            }
            CoreError::Storage(e) => {
                error!("Storage error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Storage(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Io(e) => format!("A file system operation failed: {}", e),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            _ => "An unexpected error occurred.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::RedditApi(_) => "REDDIT_API".to_string(),
            CoreError::Storage(_) => "STORAGE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            CoreError::RedditApi(e) => e.exit_code(),
            CoreError::Storage(e) => e.exit_code(),
            CoreError::Config(e) => e.exit_code(),
            CoreError::Io(_) => exit_codes::IO,
            CoreError::Network(_) => exit_codes::TEMP_FAIL,
            CoreError::InvalidInput { .. } => exit_codes::CONFIG,
            CoreError::Serialization(_) | CoreError::Internal { .. } => exit_codes::SOFTWARE,
        }
    }
}

impl ErrorExt for RedditApiError {
    fn log_error(&self) -> &Self {
        error!("RedditApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("RedditApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { reason } => format!(
                "Reddit authorization failed ({}). Please run the bot again and click 'Allow'.",
                reason
            ),
            RedditApiError::AuthorizationTimeout { seconds } => format!(
                "Unable to authorize Reddit; no response from the browser within {} seconds.",
                seconds
            ),
            RedditApiError::MissingRefreshToken => {
                "Stored Reddit credentials have no refresh token. Delete the credential file and run the bot again to re-authorize."
                    .to_string()
            }
            RedditApiError::MissingAccessToken => {
                "Reddit did not return an access token. Please run the bot again to re-authorize."
                    .to_string()
            }
            RedditApiError::InvalidToken => {
                "Reddit rejected the authorization grant. Delete the credential file and run the bot again to re-authorize."
                    .to_string()
            }
            RedditApiError::CallbackListenerFailed { address, .. } => format!(
                "Could not listen for the Reddit authorization callback on {}. Is another program using that port?",
                address
            ),
            _ => "Reddit API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED".to_string(),
            RedditApiError::AuthorizationTimeout { .. } => "REDDIT_AUTH_TIMEOUT".to_string(),
            RedditApiError::MissingAccessToken => "REDDIT_MISSING_ACCESS_TOKEN".to_string(),
            RedditApiError::MissingRefreshToken => "REDDIT_MISSING_REFRESH_TOKEN".to_string(),
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN".to_string(),
            RedditApiError::TokenExchangeFailed { .. } => "REDDIT_TOKEN_EXCHANGE_FAILED".to_string(),
            RedditApiError::CallbackListenerFailed { .. } => "REDDIT_CALLBACK_LISTENER".to_string(),
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE".to_string(),
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            RedditApiError::AuthorizationTimeout { .. }
            | RedditApiError::TokenExchangeFailed { .. }
            | RedditApiError::InvalidResponse { .. } => exit_codes::TEMP_FAIL,
            RedditApiError::AuthenticationFailed { .. }
            | RedditApiError::MissingAccessToken
            | RedditApiError::MissingRefreshToken
            | RedditApiError::InvalidToken => exit_codes::NO_PERM,
            RedditApiError::CallbackListenerFailed { .. } => exit_codes::IO,
        }
    }
}

impl ErrorExt for StorageError {
    fn log_error(&self) -> &Self {
        error!("StorageError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StorageError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StorageError::CredentialStoreMissing { path } => format!(
                "No saved Reddit credentials found at {}.",
                path.display()
            ),
            StorageError::CredentialStoreCorrupt { path, .. } => format!(
                "Saved Reddit credentials in {} could not be read. Delete the file to re-authorize.",
                path.display()
            ),
            StorageError::SubredditListMissing { path } => {
                format!("Subreddit list not found at {}.", path.display())
            }
            StorageError::SubredditListCorrupt { path, .. } => format!(
                "Subreddit list {} must be a JSON array of subreddit names.",
                path.display()
            ),
            StorageError::ReadFailed { path, .. } => {
                format!("Could not read {}. Please check file permissions.", path.display())
            }
            StorageError::WriteFailed { path, .. } => {
                format!("Could not write {}. Please check file permissions.", path.display())
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            StorageError::CredentialStoreMissing { .. } => "STORAGE_CREDENTIALS_MISSING".to_string(),
            StorageError::CredentialStoreCorrupt { .. } => "STORAGE_CREDENTIALS_CORRUPT".to_string(),
            StorageError::SubredditListMissing { .. } => "STORAGE_SUBREDDITS_MISSING".to_string(),
            StorageError::SubredditListCorrupt { .. } => "STORAGE_SUBREDDITS_CORRUPT".to_string(),
            StorageError::ReadFailed { .. } => "STORAGE_READ_FAILED".to_string(),
            StorageError::WriteFailed { .. } => "STORAGE_WRITE_FAILED".to_string(),
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            StorageError::ReadFailed { .. } | StorageError::WriteFailed { .. } => exit_codes::IO,
            _ => exit_codes::CONFIG,
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::EmptyScriptLibrary { dir, max_bytes } => format!(
                "No suitable scripts found! Please add at least 1 .txt file of at most {} bytes to {} to serve as a comment template.",
                max_bytes,
                dir.display()
            ),
            ConfigError::EmptySubredditList { path } => format!(
                "No subreddits configured! Please add at least 1 subreddit name to {}.",
                path.display()
            ),
            ConfigError::InvalidRedirectUri { uri, .. } => format!(
                "The OAuth redirect URI '{}' is not a valid http://host:port/path URL.",
                uri
            ),
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ReadFailed { path, .. } => {
                format!("Could not read settings file {}.", path.display())
            }
            ConfigError::Parse(_) => {
                "Settings file format is invalid. Please check the TOML syntax.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::EmptyScriptLibrary { .. } => "CONFIG_EMPTY_SCRIPT_LIBRARY".to_string(),
            ConfigError::EmptySubredditList { .. } => "CONFIG_EMPTY_SUBREDDIT_LIST".to_string(),
            ConfigError::InvalidRedirectUri { .. } => "CONFIG_INVALID_REDIRECT_URI".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ReadFailed { .. } => "CONFIG_READ_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }

    fn exit_code(&self) -> u8 {
        exit_codes::CONFIG
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }

    /// Reports a startup failure and returns the exit code the process should use.
    pub fn report_fatal(&self, error: &CoreError) -> u8 {
        self.report_error(error);
        eprintln!("{}", error.user_friendly_message());
        error.exit_code()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
