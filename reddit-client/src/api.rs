use crate::oauth::{RedditOAuth2Config, RedditOAuthClient};
use berner_core::{CoreResult, Credentials, RedditApiError};
use tracing::info;

/// Authorized handle to Reddit's API for the account in `credentials`.
pub struct RedditApi {
    credentials: Credentials,
    oauth: RedditOAuthClient,
}

impl RedditApi {
    pub fn new(credentials: Credentials, config: &RedditOAuth2Config) -> CoreResult<Self> {
        if !credentials.has_refresh_token() {
            return Err(RedditApiError::MissingRefreshToken.into());
        }

        let oauth = RedditOAuthClient::new(RedditOAuth2Config {
            client_id: credentials.app_id.clone(),
            ..config.clone()
        })?;

        info!("Reddit API client ready for app {}", credentials.app_id);
        Ok(Self { credentials, oauth })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    pub fn access_token(&self) -> &str {
        &self.credentials.access_token
    }

    pub fn user_agent(&self) -> &str {
        &self.oauth.config().user_agent
    }

    /// Mints a new access token from the stored refresh token. Callers persist
    /// the returned credentials.
    pub async fn refresh_access_token(&mut self) -> CoreResult<&Credentials> {
        let tokens = self.oauth.refresh_token(&self.credentials.refresh_token).await?;
        self.credentials.access_token = tokens.access_token;
        self.credentials.refresh_token = tokens.refresh_token;
        Ok(&self.credentials)
    }
}
