//! Session checks and the cached signed-in identity
//!
//! The backend session is a server-side cookie-backed record; the client
//! only carries the cookie and asks the backend who it belongs to. The
//! answer is cached process-wide so independent components share one
//! identity lookup instead of each asking again, and the cache is
//! dropped on explicit sign-out or the first 401/403 seen by any call.

use serde::Deserialize;
use tracing::{debug, trace};

use super::AvenueClient;
use crate::error::{AvenueError, Result};

/// Identity of the signed-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionData {
    /// Account email
    pub email: String,
    /// Account username; authors are addressed by it
    pub username: String,
}

impl AvenueClient {
    /// Check whether the session cookie is still valid
    ///
    /// A non-success status means "not signed in", not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::Http`] only on transport failure.
    pub async fn check_session(&self) -> Result<bool> {
        trace!("checking session");
        let response = self
            .http()
            .get(self.url("/check-session/"))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// Fetch the signed-in identity, reusing the cached copy if present
    ///
    /// The backend signals a live session by including the email; a
    /// response without it is treated as malformed rather than silently
    /// anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`AvenueError::SessionExpired`] - The backend rejected the cookie
    /// - [`AvenueError::MissingField`] - The response lacks `email` or `username`
    /// - [`AvenueError::Http`] - Transport failure
    pub async fn session_data(&self) -> Result<SessionData> {
        if let Some(cached) = &*self.session_slot().read().await {
            trace!(username = %cached.username, "session data served from cache");
            return Ok(cached.clone());
        }

        let response = self
            .http()
            .get(self.url("/get-session-data/"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        let Some(email) = body.get("email").and_then(|v| v.as_str()) else {
            return Err(AvenueError::MissingField("email"));
        };
        let Some(username) = body.get("username").and_then(|v| v.as_str()) else {
            return Err(AvenueError::MissingField("username"));
        };

        let session = SessionData {
            email: email.to_string(),
            username: username.to_string(),
        };
        *self.session_slot().write().await = Some(session.clone());
        debug!(username = %session.username, "session data cached");
        Ok(session)
    }

    /// Drop the cached identity (sign-out, or to force a re-fetch)
    pub async fn invalidate_session(&self) {
        self.clear_session().await;
    }

    pub(crate) async fn clear_session(&self) {
        *self.session_slot().write().await = None;
    }
}
