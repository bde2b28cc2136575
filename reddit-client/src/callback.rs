//! Local HTTP listener that receives Reddit's OAuth redirect.

use crate::oauth::CallbackParams;
use berner_core::{ConfigError, CoreResult, RedditApiError};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use oauth2::{AuthorizationCode, CsrfToken};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

pub type CallbackOutcome = CoreResult<AuthorizationCode>;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html><html><body>
<h1>Reddit authorization successful!</h1>
<p>You can close this tab and return to RedditBerner.</p>
<script>setTimeout(() => window.close(), 2000);</script>
</body></html>"#;

const DENIED_PAGE: &str = r#"<!DOCTYPE html><html><body>
<h1>Reddit authorization failed</h1>
<p>Return to RedditBerner for details.</p>
</body></html>"#;

const BAD_STATE_PAGE: &str = r#"<!DOCTYPE html><html><body>
<h1>Authorization failed</h1><p>Missing or invalid state parameter</p>
</body></html>"#;

const MISSING_CODE_PAGE: &str = r#"<!DOCTYPE html><html><body>
<h1>Authorization failed</h1><p>Missing authorization code</p>
</body></html>"#;

struct CallbackContext {
    path: String,
    authority: String,
    expected_state: CsrfToken,
    sender: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

/// Listens on the redirect URI's host and port until the first valid callback
/// arrives or the listener is shut down.
pub struct CallbackListener {
    local_addr: SocketAddr,
    outcome: Option<oneshot::Receiver<CallbackOutcome>>,
    shutdown: CancellationToken,
    server: Option<JoinHandle<()>>,
}

impl CallbackListener {
    pub async fn bind(redirect_uri: &str, expected_state: CsrfToken) -> CoreResult<Self> {
        let invalid = |reason: String| ConfigError::InvalidRedirectUri {
            uri: redirect_uri.to_string(),
            reason,
        };
        let url = Url::parse(redirect_uri).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let address = format!("{}:{}", host, port);

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            RedditApiError::CallbackListenerFailed {
                address: address.clone(),
                reason: e.to_string(),
            }
        })?;
        let local_addr = listener.local_addr()?;
        info!("Listening for Reddit OAuth callback on {}", local_addr);

        let (sender, receiver) = oneshot::channel();
        let context = Arc::new(CallbackContext {
            path: url.path().to_string(),
            authority: address,
            expected_state,
            sender: Mutex::new(Some(sender)),
        });

        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(listener, context, shutdown.clone()));

        Ok(Self {
            local_addr,
            outcome: Some(receiver),
            shutdown,
            server: Some(server),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Takes the completion signal. Resolves once with the first valid callback.
    pub fn take_outcome(&mut self) -> Option<oneshot::Receiver<CallbackOutcome>> {
        self.outcome.take()
    }

    /// Stops accepting connections and waits until the socket is closed.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(server) = self.server.take() {
            if let Err(e) = server.await {
                warn!("Callback listener task ended abnormally: {}", e);
            }
        }
        debug!("Callback listener on {} released", self.local_addr);
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

async fn serve(listener: TcpListener, context: Arc<CallbackContext>, shutdown: CancellationToken) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!("Accepted callback connection from {}", peer);
                    let context = context.clone();
                    let service = service_fn(move |req| handle_request(context.clone(), req));
                    connections.spawn(async move {
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            debug!("Callback connection closed with error: {}", e);
                        }
                    });
                }
                Err(e) => warn!("Failed to accept callback connection: {}", e),
            },
        }
    }

    connections.shutdown().await;
}

async fn handle_request(
    context: Arc<CallbackContext>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if req.method() != Method::GET || req.uri().path() != context.path {
        return Ok(page(StatusCode::NOT_FOUND, "Not Found"));
    }

    let full_url = format!("http://{}{}", context.authority, req.uri());
    let params = match CallbackParams::parse(&full_url) {
        Ok(params) => params,
        Err(e) => {
            debug!("Ignoring malformed callback: {}", e);
            return Ok(page(StatusCode::BAD_REQUEST, BAD_STATE_PAGE));
        }
    };

    // Stray or forged requests must not end the session.
    if !params.state_matches(&context.expected_state) {
        warn!("Ignoring OAuth callback with missing or mismatched state");
        return Ok(page(StatusCode::BAD_REQUEST, BAD_STATE_PAGE));
    }

    if params.error.is_none() && params.code.as_deref().map_or(true, str::is_empty) {
        warn!("Ignoring OAuth callback without a code or error");
        return Ok(page(StatusCode::BAD_REQUEST, MISSING_CODE_PAGE));
    }

    let outcome = params.into_code(&context.expected_state);
    let succeeded = outcome.is_ok();
    deliver(&context, outcome).await;

    if succeeded {
        Ok(page(StatusCode::OK, SUCCESS_PAGE))
    } else {
        Ok(page(StatusCode::OK, DENIED_PAGE))
    }
}

async fn deliver(context: &CallbackContext, outcome: CallbackOutcome) {
    match context.sender.lock().await.take() {
        Some(sender) => {
            if sender.send(outcome).is_err() {
                debug!("Authorization session already ended; dropping callback");
            }
        }
        None => debug!("Duplicate OAuth callback ignored"),
    }
}

fn page(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}
