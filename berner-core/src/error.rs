use std::path::PathBuf;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Timed out after {seconds} seconds waiting for Reddit authorization")]
    AuthorizationTimeout { seconds: u64 },

    #[error("Access token is missing or empty")]
    MissingAccessToken,

    #[error("Refresh token is missing or empty")]
    MissingRefreshToken,

    #[error("Invalid OAuth token")]
    InvalidToken,

    #[error("Token exchange failed: {details}")]
    TokenExchangeFailed { details: String },

    #[error("Callback listener on {address} failed: {reason}")]
    CallbackListenerFailed { address: String, reason: String },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Credential store not found: {}", path.display())]
    CredentialStoreMissing { path: PathBuf },

    #[error("Credential store {} is corrupt: {details}", path.display())]
    CredentialStoreCorrupt { path: PathBuf, details: String },

    #[error("Subreddit list not found: {}", path.display())]
    SubredditListMissing { path: PathBuf },

    #[error("Subreddit list {} is corrupt: {details}", path.display())]
    SubredditListCorrupt { path: PathBuf, details: String },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No script templates of at most {max_bytes} bytes found in {}", dir.display())]
    EmptyScriptLibrary { dir: PathBuf, max_bytes: u64 },

    #[error("Subreddit list {} is empty", path.display())]
    EmptySubredditList { path: PathBuf },

    #[error("Invalid redirect URI {uri}: {reason}")]
    InvalidRedirectUri { uri: String, reason: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Failed to read settings file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
