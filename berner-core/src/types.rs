use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The single record kept in the credential store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(alias = "AppId")]
    pub app_id: String,
    #[serde(alias = "AccessToken")]
    pub access_token: String,
    #[serde(alias = "RefreshToken")]
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, tokens: TokenPair) -> Self {
        Self {
            app_id: app_id.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Tokens obtained from the authorization-code grant.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// A canned comment body loaded from the scripts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    pub path: PathBuf,
    pub content: String,
}

pub type SubredditList = Vec<String>;
