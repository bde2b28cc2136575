use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "RedditBerner.toml";
pub const CREDENTIALS_FILE_NAME: &str = "RedditBerner.config.json";
pub const SUBREDDITS_FILE_NAME: &str = "subreddits.json";

/// Registered installed-app id. Public client, no secret.
pub const DEFAULT_APP_ID: &str = "z8huXvY0aph0PQ";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/Reddit.NET/oauthRedirect";
pub const DEFAULT_AUTHORIZATION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_SCRIPT_BYTES: u64 = 10_000;

pub const DEFAULT_SUBREDDITS: [&str; 4] = [
    "StillSandersForPres",
    "WayOfTheBern",
    "SandersForPresident",
    "BernieSanders",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub app_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub user_agent: String,
    pub authorization_timeout_secs: u64,
    pub config_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub max_script_bytes: u64,
    /// Browser executable used when the platform default cannot be launched.
    pub browser_path: Option<PathBuf>,
    pub default_subreddits: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: ["identity", "read", "submit", "history"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            user_agent: format!("redditberner/{}", env!("CARGO_PKG_VERSION")),
            authorization_timeout_secs: DEFAULT_AUTHORIZATION_TIMEOUT_SECS,
            config_dir: PathBuf::from("config"),
            scripts_dir: PathBuf::from("scripts"),
            max_script_bytes: DEFAULT_MAX_SCRIPT_BYTES,
            browser_path: None,
            default_subreddits: DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BotConfig {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<config_dir>/RedditBerner.toml` if present, otherwise use defaults.
    pub fn load_or_default(config_dir: impl AsRef<Path>) -> CoreResult<Self> {
        let path = config_dir.as_ref().join(SETTINGS_FILE_NAME);
        if path.is_file() {
            tracing::info!("Loading settings from {}", path.display());
            Self::from_file(&path)
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            let config = Self {
                config_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            };
            config.validate()?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(invalid_value("app_id", &self.app_id));
        }
        if self.authorization_timeout_secs == 0 {
            return Err(invalid_value(
                "authorization_timeout_secs",
                &self.authorization_timeout_secs.to_string(),
            ));
        }
        if self.max_script_bytes == 0 {
            return Err(invalid_value(
                "max_script_bytes",
                &self.max_script_bytes.to_string(),
            ));
        }
        self.redirect_url()?;
        Ok(())
    }

    /// Parsed redirect URI. Must be a plain http URL with a host.
    pub fn redirect_url(&self) -> CoreResult<Url> {
        let invalid = |reason: &str| ConfigError::InvalidRedirectUri {
            uri: self.redirect_uri.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.redirect_uri).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid("only http redirect URIs can be served locally").into());
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host").into());
        }
        Ok(url)
    }

    pub fn authorization_timeout(&self) -> Duration {
        Duration::from_secs(self.authorization_timeout_secs)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE_NAME)
    }

    pub fn subreddits_path(&self) -> PathBuf {
        self.config_dir.join(SUBREDDITS_FILE_NAME)
    }

    /// Point both the config and scripts directories under `base`.
    pub fn rooted_at(mut self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        self.config_dir = base.join(&self.config_dir);
        self.scripts_dir = base.join(&self.scripts_dir);
        self
    }
}

fn invalid_value(field: &str, value: &str) -> crate::CoreError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}
