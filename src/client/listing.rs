//! Article listing endpoints
//!
//! The authenticated "your articles" and "your drafts" views call
//! distinct per-kind listing endpoints; the public author page reuses
//! the completed listing. Ownership of drafts is enforced by the
//! backend against the session cookie, not by this client.

use serde_json::json;
use tracing::trace;

use super::AvenueClient;
use crate::article::{Article, CategorizedFeed, WireArticle, WireFeed};
use crate::error::Result;

impl AvenueClient {
    /// List an author's completed (published) articles
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::Status`] - The backend rejected the request
    /// - [`crate::AvenueError::Json`] - The response was not an article list
    /// - [`crate::AvenueError::MalformedDocument`] - An article carried an
    ///   undecodable document
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn completed_by_author(&self, username: &str) -> Result<Vec<Article>> {
        trace!(username, "listing completed articles");
        self.list_articles("/get-articles-by-username/", username)
            .await
    }

    /// List an author's drafts
    ///
    /// The backend only returns drafts owned by the session making the
    /// call.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AvenueClient::completed_by_author`], plus
    /// [`crate::AvenueError::SessionExpired`] when the cookie is gone.
    pub async fn drafts_by_author(&self, username: &str) -> Result<Vec<Article>> {
        trace!(username, "listing draft articles");
        self.list_articles("/get-draft-articles-by-username/", username)
            .await
    }

    async fn list_articles(&self, path: &str, username: &str) -> Result<Vec<Article>> {
        let response = self
            .http()
            .post(self.url(path))
            .json(&json!({ "username": username }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        let wire: Vec<WireArticle> = response.json().await?;
        wire.into_iter().map(WireArticle::into_article).collect()
    }

    /// Fetch the public home feed, grouped by category
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::Status`] - The backend rejected the request
    /// - [`crate::AvenueError::Json`] - The response was not the feed shape
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn categorized_feed(&self) -> Result<CategorizedFeed> {
        trace!("fetching categorized feed");
        let response = self
            .http()
            .get(self.url("/get-articles-categories/"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        let wire: WireFeed = response.json().await?;
        wire.into_feed()
    }
}
