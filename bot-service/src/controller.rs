use crate::browser::{BrowserLauncher, SystemBrowser};
use crate::operator::{ConsoleOperator, Operator};
use berner_core::{
    BotConfig, ConfigError, CoreError, CoreResult, Credentials, RedditApiError, ScriptTemplate,
    StorageError, SubredditList,
};
use reddit_client::{
    AuthorizationSession, RedditApi, RedditOAuth2Config, RedditOAuthClient, TokenExchange,
};
use std::fs;
use storage::{CredentialStore, ScriptLibrary, SubredditStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const WELCOME_BANNER: &str = "****************************
* Welcome to RedditBerner! *
****************************";

const AUTHORIZATION_INSTRUCTIONS: &str = "Before the bot can run, we'll need to link it to your Reddit account.
This is very easy: when you continue, a browser window will open and take you to the Reddit authorization page.
Enter your username/password if you're not already logged in, then scroll down and click on the 'Allow' button to authorize this app to use your Reddit account.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Authorizing,
    Ready,
    Active,
    Stopped,
}

/// Bootstraps credentials, subreddits and scripts, then hosts the run loop.
pub struct BotController<X: TokenExchange> {
    config: BotConfig,
    oauth_config: RedditOAuth2Config,
    exchange: X,
    operator: Box<dyn Operator>,
    browser: Box<dyn BrowserLauncher>,
    credential_store: CredentialStore,
    subreddit_store: SubredditStore,
    script_library: ScriptLibrary,
    state: LifecycleState,
    subreddits: SubredditList,
    scripts: Vec<ScriptTemplate>,
    reddit: Option<RedditApi>,
    stop: CancellationToken,
}

impl BotController<RedditOAuthClient> {
    /// Console prompts, the system browser and Reddit's token endpoint.
    pub fn interactive(config: BotConfig) -> CoreResult<Self> {
        let exchange = RedditOAuthClient::new(RedditOAuth2Config::from(&config))?;
        let browser = SystemBrowser::new(config.browser_path.clone());
        Self::new(
            config,
            exchange,
            Box::new(ConsoleOperator),
            Box::new(browser),
        )
    }
}

impl<X: TokenExchange> BotController<X> {
    pub fn new(
        config: BotConfig,
        exchange: X,
        operator: Box<dyn Operator>,
        browser: Box<dyn BrowserLauncher>,
    ) -> CoreResult<Self> {
        config.validate()?;

        Ok(Self {
            oauth_config: RedditOAuth2Config::from(&config),
            credential_store: CredentialStore::new(config.credentials_path()),
            subreddit_store: SubredditStore::new(config.subreddits_path()),
            script_library: ScriptLibrary::new(&config.scripts_dir, config.max_script_bytes),
            config,
            exchange,
            operator,
            browser,
            state: LifecycleState::Uninitialized,
            subreddits: Vec::new(),
            scripts: Vec::new(),
            reddit: None,
            stop: CancellationToken::new(),
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    pub fn scripts(&self) -> &[ScriptTemplate] {
        &self.scripts
    }

    pub fn reddit(&self) -> Option<&RedditApi> {
        self.reddit.as_ref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.reddit.as_ref().map(RedditApi::credentials)
    }

    /// Cancelling the returned token ends [`start`](Self::start).
    pub fn stop_handle(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Runs every startup step. Any failure is fatal and leaves no API client.
    pub async fn initialize(&mut self) -> CoreResult<()> {
        if self.state != LifecycleState::Uninitialized {
            return Err(CoreError::Internal {
                message: format!("cannot initialize from state {:?}", self.state),
            });
        }

        fs::create_dir_all(&self.config.config_dir).map_err(|source| {
            StorageError::WriteFailed {
                path: self.config.config_dir.clone(),
                source,
            }
        })?;

        let credentials = match self.credential_store.load() {
            Ok(credentials) => credentials,
            Err(CoreError::Storage(StorageError::CredentialStoreMissing { .. })) => {
                self.authorize().await?
            }
            Err(e) => return Err(e),
        };
        if !credentials.has_refresh_token() {
            return Err(RedditApiError::MissingRefreshToken.into());
        }

        let subreddits = self
            .subreddit_store
            .load_or_seed(&self.config.default_subreddits)?;
        if subreddits.is_empty() {
            return Err(ConfigError::EmptySubredditList {
                path: self.subreddit_store.path().to_path_buf(),
            }
            .into());
        }

        self.script_library.ensure_dir()?;
        let scripts = self.script_library.load();
        if scripts.is_empty() {
            return Err(ConfigError::EmptyScriptLibrary {
                dir: self.script_library.dir().to_path_buf(),
                max_bytes: self.script_library.max_bytes(),
            }
            .into());
        }

        let reddit = RedditApi::new(credentials, &self.oauth_config)?;

        info!(
            "Ready with {} subreddits and {} scripts",
            subreddits.len(),
            scripts.len()
        );
        self.subreddits = subreddits;
        self.scripts = scripts;
        self.reddit = Some(reddit);
        self.transition(LifecycleState::Ready);
        Ok(())
    }

    async fn authorize(&mut self) -> CoreResult<Credentials> {
        self.transition(LifecycleState::Authorizing);

        self.operator.notify(WELCOME_BANNER);
        self.operator.confirm(AUTHORIZATION_INSTRUCTIONS)?;

        let session =
            AuthorizationSession::begin(&self.oauth_config, self.config.authorization_timeout())
                .await?;

        self.operator.notify("Opening web browser....");
        if let Err(e) = self.browser.open(session.authorization_url()) {
            warn!("Could not launch a browser: {}", e);
            self.operator.notify(&format!(
                "Could not open a browser. Please visit this URL to authorize the bot:\n{}",
                session.authorization_url()
            ));
        }

        let tokens = session.wait(&self.exchange).await?;
        let credentials = Credentials::new(self.config.app_id.clone(), tokens);
        self.credential_store.save(&credentials)?;

        self.operator.confirm("Reddit authentication successful!")?;
        Ok(credentials)
    }

    /// Enters the active state and stays there until the stop handle is cancelled.
    pub async fn start(&mut self) -> CoreResult<()> {
        if self.state != LifecycleState::Ready {
            return Err(CoreError::Internal {
                message: format!("cannot start from state {:?}", self.state),
            });
        }

        self.transition(LifecycleState::Active);
        info!("Commencing bot workflow....");

        // Work units go here; each should observe `self.stop` between steps.
        self.stop.cancelled().await;

        self.transition(LifecycleState::Stopped);
        info!("Bot workflow terminated.");
        Ok(())
    }

    fn transition(&mut self, next: LifecycleState) {
        info!("Lifecycle: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
