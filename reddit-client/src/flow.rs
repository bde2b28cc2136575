//! Interactive authorization-code handshake.
//!
//! A session binds the callback listener first, then exposes the authorization
//! URL for the caller to present. [`AuthorizationSession::wait`] resolves when
//! the listener reports a callback and the code has been exchanged, or fails
//! with `AuthorizationTimeout` once the deadline passes. The listener is
//! released on every path.

use crate::callback::{CallbackListener, CallbackOutcome};
use crate::oauth::{RedditOAuth2Config, RedditOAuthClient};
use berner_core::{CoreError, CoreResult, RedditApiError, TokenPair};
use oauth2::AuthorizationCode;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

/// Redeems an authorization code for tokens.
pub trait TokenExchange {
    fn exchange(&self, code: AuthorizationCode) -> impl Future<Output = CoreResult<TokenPair>>;
}

impl TokenExchange for RedditOAuthClient {
    fn exchange(&self, code: AuthorizationCode) -> impl Future<Output = CoreResult<TokenPair>> {
        self.exchange_code(code)
    }
}

pub struct AuthorizationSession {
    authorization_url: String,
    listener: CallbackListener,
    outcome: oneshot::Receiver<CallbackOutcome>,
    deadline: Instant,
    timeout: Duration,
}

impl AuthorizationSession {
    /// Starts listening on the redirect URI and prepares the authorization URL.
    pub async fn begin(config: &RedditOAuth2Config, timeout: Duration) -> CoreResult<Self> {
        let mut client = RedditOAuthClient::new(config.clone())?;
        let (authorization_url, csrf_token) = client.generate_auth_url(&config.scopes)?;

        let mut listener = CallbackListener::bind(&config.redirect_uri, csrf_token).await?;
        let outcome = listener.take_outcome().ok_or_else(|| CoreError::Internal {
            message: "callback outcome already taken".to_string(),
        })?;

        Ok(Self {
            authorization_url,
            listener,
            outcome,
            deadline: Instant::now() + timeout,
            timeout,
        })
    }

    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub async fn wait<X: TokenExchange>(self, exchange: &X) -> CoreResult<TokenPair> {
        let Self {
            listener,
            outcome,
            deadline,
            timeout,
            ..
        } = self;

        let result = timeout_at(deadline, async {
            let code = outcome.await.map_err(|_| CoreError::Internal {
                message: "OAuth callback listener stopped before a callback arrived".to_string(),
            })??;
            info!("Received OAuth callback");

            let tokens = exchange.exchange(code).await?;
            if tokens.access_token.trim().is_empty() {
                return Err(RedditApiError::MissingAccessToken.into());
            }
            if tokens.refresh_token.trim().is_empty() {
                return Err(RedditApiError::MissingRefreshToken.into());
            }
            Ok::<_, CoreError>(tokens)
        })
        .await;

        listener.shutdown().await;

        match result {
            Ok(tokens) => tokens,
            Err(_) => {
                warn!("No OAuth callback within {:?}", timeout);
                Err(RedditApiError::AuthorizationTimeout {
                    seconds: timeout.as_secs(),
                }
                .into())
            }
        }
    }
}
