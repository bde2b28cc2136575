use berner_core::{BotConfig, CoreError, CoreResult, RedditApiError, TokenPair};
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, HttpRequest, HttpResponse,
    RedirectUrl, RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

#[derive(Debug, Clone)]
pub struct RedditOAuth2Config {
    pub client_id: String,
    pub redirect_uri: String,
    pub user_agent: String,
    pub scopes: Vec<String>,
    pub token_url: String,
}

impl RedditOAuth2Config {
    pub fn new(client_id: String, redirect_uri: String, user_agent: String) -> Self {
        Self {
            client_id,
            redirect_uri,
            user_agent,
            scopes: vec!["identity".to_string(), "read".to_string()],
            token_url: REDDIT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }
}

impl From<&BotConfig> for RedditOAuth2Config {
    fn from(config: &BotConfig) -> Self {
        Self::new(
            config.app_id.clone(),
            config.redirect_uri.clone(),
            config.user_agent.clone(),
        )
        .with_scopes(config.scopes.clone())
    }
}

#[derive(Debug, Clone)]
pub enum AuthState {
    NotAuthenticated,
    PendingAuthorization { csrf_state: String },
    Authorized,
}

/// Query parameters Reddit appends to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    pub fn parse(callback_url: &str) -> CoreResult<Self> {
        let url = Url::parse(callback_url).map_err(|e| CoreError::InvalidInput {
            message: format!("Invalid callback URL: {}", e),
        })?;

        let mut params = Self {
            code: None,
            state: None,
            error: None,
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }

    pub fn state_matches(&self, expected: &CsrfToken) -> bool {
        self.state.as_deref() == Some(expected.secret().as_str())
    }

    /// Resolves the callback to an authorization code, validating the CSRF state.
    pub fn into_code(self, expected: &CsrfToken) -> CoreResult<AuthorizationCode> {
        if let Some(error) = self.error {
            return Err(authentication_failed(error));
        }

        match self.state.as_deref() {
            None => return Err(authentication_failed("Missing state parameter")),
            Some(state) if state != expected.secret() => {
                return Err(authentication_failed("CSRF token mismatch"));
            }
            Some(_) => {}
        }

        self.code
            .filter(|code| !code.is_empty())
            .map(AuthorizationCode::new)
            .ok_or_else(|| authentication_failed("Missing authorization code"))
    }
}

/// Installed-app OAuth2 client for Reddit's authorization-code grant.
pub struct RedditOAuthClient {
    config: RedditOAuth2Config,
    oauth_client: BasicClient,
    http_client: Client,
    auth_state: AuthState,
}

impl RedditOAuthClient {
    pub fn new(config: RedditOAuth2Config) -> CoreResult<Self> {
        let auth_url = AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(internal)?;
        let token_url = TokenUrl::new(config.token_url.clone()).map_err(|_| {
            berner_core::ConfigError::InvalidValue {
                field: "token_url".to_string(),
                value: config.token_url.clone(),
            }
        })?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone()).map_err(|e| {
            berner_core::ConfigError::InvalidRedirectUri {
                uri: config.redirect_uri.clone(),
                reason: e.to_string(),
            }
        })?;

        // Installed apps have no secret; Reddit expects basic auth as `client_id:`.
        let oauth_client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(String::new())),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url);

        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            config,
            oauth_client,
            http_client,
            auth_state: AuthState::NotAuthenticated,
        })
    }

    pub fn config(&self) -> &RedditOAuth2Config {
        &self.config
    }

    pub fn get_auth_state(&self) -> &AuthState {
        &self.auth_state
    }

    pub fn generate_auth_url(&mut self, scopes: &[String]) -> CoreResult<(String, CsrfToken)> {
        let (auth_url, csrf_token) = self
            .oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().map(|s| Scope::new(s.clone())))
            .add_extra_param("duration", "permanent")
            .url();

        self.auth_state = AuthState::PendingAuthorization {
            csrf_state: csrf_token.secret().clone(),
        };
        debug!("Generated authorization URL with scopes {:?}", scopes);

        Ok((auth_url.to_string(), csrf_token))
    }

    pub fn handle_callback(
        &mut self,
        callback_url: &str,
        csrf_token: &CsrfToken,
    ) -> CoreResult<AuthorizationCode> {
        let code = CallbackParams::parse(callback_url)?.into_code(csrf_token)?;
        self.auth_state = AuthState::Authorized;
        Ok(code)
    }

    pub async fn exchange_code(&self, code: AuthorizationCode) -> CoreResult<TokenPair> {
        info!("Exchanging authorization code for tokens");
        let response = self
            .oauth_client
            .exchange_code(code)
            .request_async(|request| send_token_request(&self.http_client, request))
            .await
            .map_err(token_request_error)?;

        let refresh_token = response
            .refresh_token()
            .map(|token| token.secret().clone())
            .filter(|token| !token.is_empty())
            .ok_or(RedditApiError::MissingRefreshToken)?;

        Ok(TokenPair::new(
            response.access_token().secret().clone(),
            refresh_token,
        ))
    }

    /// Redeems a refresh token. Reddit does not rotate refresh tokens, so the
    /// one passed in is kept when the response omits it.
    pub async fn refresh_token(&self, refresh_token: &str) -> CoreResult<TokenPair> {
        info!("Refreshing Reddit access token");
        let response: BasicTokenResponse = self
            .oauth_client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(|request| send_token_request(&self.http_client, request))
            .await
            .map_err(token_request_error)?;

        let refresh_token = response
            .refresh_token()
            .map(|token| token.secret().clone())
            .unwrap_or_else(|| refresh_token.to_string());

        Ok(TokenPair::new(
            response.access_token().secret().clone(),
            refresh_token,
        ))
    }
}

async fn send_token_request(
    client: &Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = client
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

fn token_request_error(error: RequestTokenError<reqwest::Error, BasicErrorResponse>) -> CoreError {
    match error {
        RequestTokenError::Request(e) => CoreError::Network(e),
        RequestTokenError::ServerResponse(response)
            if *response.error() == BasicErrorResponseType::InvalidGrant =>
        {
            RedditApiError::InvalidToken.into()
        }
        RequestTokenError::ServerResponse(response) => {
            RedditApiError::TokenExchangeFailed {
                details: response.to_string(),
            }
            .into()
        }
        RequestTokenError::Parse(e, _) => RedditApiError::InvalidResponse {
            details: e.to_string(),
        }
        .into(),
        RequestTokenError::Other(details) => RedditApiError::TokenExchangeFailed { details }.into(),
    }
}

fn authentication_failed(reason: impl Into<String>) -> CoreError {
    RedditApiError::AuthenticationFailed {
        reason: reason.into(),
    }
    .into()
}

fn internal(error: url::ParseError) -> CoreError {
    CoreError::Internal {
        message: error.to_string(),
    }
}
