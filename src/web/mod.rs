//! HTTP surface: routes, shared state and server startup.
//!
//! | Route               | Method   | Behaviour                                  |
//! |---------------------|----------|--------------------------------------------|
//! | `/`                 | GET      | landing page                               |
//! | `/chat`             | GET      | render conversation and pending notices    |
//! | `/chat`             | POST     | send `message`, then redirect to `/chat`   |
//! | `/clear`            | GET      | drop the conversation, redirect to `/chat` |
//! | `/static/style.css` | GET      | stylesheet                                 |
//!
//! Anything else renders the landing page with a 404.

mod error;
mod handlers;
mod headers;
mod session;
pub mod templates;

pub use error::AppError;
pub use session::{Session, SESSION_COOKIE};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::Key;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use sha2::{Digest, Sha512};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::completion::Responder;
use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::session::SessionStore;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) responder: Arc<dyn Responder>,
    pub(crate) sessions: SessionStore,
    pub(crate) key: Key,
}

impl AppState {
    pub fn new(config: &ChatConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            sessions: SessionStore::new(config.max_sessions, config.session_ttl),
            key: session_key(&config.session_secret),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// Derive the cookie signing key from the configured secret.
fn session_key(secret: &str) -> Key {
    // SHA-512 yields the 64 bytes `Key::from` requires.
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/chat",
            get(handlers::chat_page).post(handlers::send_message),
        )
        .route("/clear", get(handlers::clear))
        .route(headers::STYLESHEET_PATH, get(handlers::stylesheet))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(headers::response_headers))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ChatError> {
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve until `signal` resolves, then drain open connections.
///
/// Connections are driven by hyper directly so the `Date` header can be
/// switched off.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    signal: F,
) -> Result<(), ChatError>
where
    F: Future<Output = ()>,
{
    let addr = listener.local_addr()?;
    info!(%addr, "PocketChat listening");

    let service = TowerToHyperService::new(router(state));
    let graceful = GracefulShutdown::new();
    let mut builder = http1::Builder::new();
    builder.auto_date_header(false);

    tokio::pin!(signal);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, remote) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                };
                let connection = builder.serve_connection(TokioIo::new(stream), service.clone());
                let connection = graceful.watch(connection);
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        debug!(%remote, error = %e, "Connection closed with error");
                    }
                });
            }
            () = &mut signal => break,
        }
    }

    graceful.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
