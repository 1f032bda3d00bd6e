//! Persistence protocol client for the Article Avenue backend
//!
//! All backend state lives behind HTTP endpoints on a single origin;
//! this client translates typed operations into those exchanges. The
//! session cookie issued at sign-in rides along automatically via the
//! HTTP client's cookie store.

mod articles;
mod author;
mod listing;
mod publishing;
mod session;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

pub use publishing::Promotion;
pub use session::SessionData;

use crate::article::ArticleId;
use crate::config::BackendConfig;
use crate::error::{AvenueError, Result};

/// Async client for the blogging backend
///
/// Cheap to share behind an `Arc`; all methods take `&self`. One client
/// holds one cookie-backed session, a process-wide cache of the
/// signed-in identity, and a per-article guard that serializes mutating
/// requests targeting the same article id.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use avenue_rs::{AvenueClient, BackendConfig};
///
/// # async fn example() -> avenue_rs::Result<()> {
/// let config = Arc::new(BackendConfig::new("https://backend.example.com"));
/// let client = AvenueClient::new(config)?;
///
/// if client.check_session().await? {
///     let who = client.session_data().await?;
///     let drafts = client.drafts_by_author(&who.username).await?;
///     println!("{} drafts", drafts.len());
/// }
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct AvenueClient {
    /// HTTP transport with the session cookie store
    http: reqwest::Client,
    /// Backend origin configuration
    config: Arc<BackendConfig>,
    /// Cached signed-in identity; cleared on sign-out or a 401/403
    session: RwLock<Option<SessionData>>,
    /// Per-article mutation guards
    article_locks: Mutex<HashMap<ArticleId, Arc<Mutex<()>>>>,
}

impl AvenueClient {
    /// Create a client for the given backend
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: Arc<BackendConfig>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(concat!("avenue-rs/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
            article_locks: Mutex::new(HashMap::new()),
        })
    }

    /// The backend configuration this client targets
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// HTTP transport handle, for submodules
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for an endpoint path
    pub(crate) fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    /// Shared cached-identity slot, for the session submodule
    pub(crate) fn session_slot(&self) -> &RwLock<Option<SessionData>> {
        &self.session
    }

    /// Guard serializing mutations of one article id
    pub(crate) async fn article_lock(&self, id: ArticleId) -> Arc<Mutex<()>> {
        let mut locks = self.article_locks.lock().await;
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Turn a non-success response into an error
    ///
    /// A 401/403 invalidates the cached identity and surfaces as
    /// [`AvenueError::SessionExpired`]; everything else becomes
    /// [`AvenueError::Status`].
    pub(crate) async fn fail_status(&self, response: reqwest::Response) -> AvenueError {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            debug!(code = status.as_u16(), "auth failure, dropping cached session");
            self.clear_session().await;
            return AvenueError::SessionExpired;
        }
        AvenueError::Status {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}
