pub mod api;
pub mod callback;
pub mod flow;
pub mod oauth;

#[cfg(test)]
mod tests;

pub use api::RedditApi;
pub use callback::{CallbackListener, CallbackOutcome};
pub use flow::{AuthorizationSession, TokenExchange};
pub use oauth::{
    AuthState, CallbackParams, RedditOAuth2Config, RedditOAuthClient, REDDIT_TOKEN_URL,
};

pub use oauth2::{AuthorizationCode, CsrfToken};
