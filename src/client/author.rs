//! Author profiles and author applications

use serde::Deserialize;
use serde_json::json;
use tracing::trace;

use super::AvenueClient;
use crate::article::AuthorInfo;
use crate::error::{AvenueError, Result};

#[derive(Debug, Deserialize)]
struct AuthorInfoEnvelope {
    #[serde(rename = "authorInfo")]
    author_info: Option<AuthorInfo>,
}

impl AvenueClient {
    /// Fetch an author's public profile
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::Status`] - The backend rejected the request
    /// - [`crate::AvenueError::MissingField`] - No profile for that username
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn author_info(&self, username: &str) -> Result<AuthorInfo> {
        trace!(username, "fetching author info");
        let response = self
            .http()
            .post(self.url("/get-author-info/"))
            .json(&json!({ "username": username }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        let envelope: AuthorInfoEnvelope = response.json().await?;
        envelope
            .author_info
            .ok_or(AvenueError::MissingField("authorInfo"))
    }

    /// Submit an application to become an author
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::Status`] - The backend rejected the application
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn submit_author_application(&self, response_text: &str) -> Result<()> {
        trace!("submitting author application");
        let response = self
            .http()
            .post(self.url("/submit-author-response/"))
            .json(&json!({ "response": response_text }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        Ok(())
    }
}
