//! Public article reads
//!
//! Published articles are addressed by author username plus title. No
//! authentication is required; these are the endpoints behind public
//! article pages.

use tracing::trace;

use super::AvenueClient;
use crate::article::{Article, WireArticle};
use crate::error::Result;
use crate::slug::title_from_slug;

impl AvenueClient {
    /// Fetch one published article by author and stored title
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::Status`] - No such article, or the backend
    ///   rejected the request
    /// - [`crate::AvenueError::Json`] - The response was not an article
    /// - [`crate::AvenueError::MalformedDocument`] - The article carried an
    ///   undecodable document
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn article_by_username_and_title(
        &self,
        username: &str,
        title: &str,
    ) -> Result<Article> {
        trace!(username, title, "fetching article");
        let response = self
            .http()
            .get(self.url("/get-article-by-username-and-name/"))
            .query(&[("username", username), ("name", title)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        let wire: WireArticle = response.json().await?;
        wire.into_article()
    }

    /// Fetch one published article by author and URL slug
    ///
    /// Hyphens in the slug are mapped back to spaces before the lookup;
    /// see [`crate::slug`] for the ambiguity this carries for titles
    /// that contain literal hyphens.
    ///
    /// # Errors
    ///
    /// Same failure modes as
    /// [`AvenueClient::article_by_username_and_title`].
    pub async fn article_by_slug(&self, username: &str, slug: &str) -> Result<Article> {
        self.article_by_username_and_title(username, &title_from_slug(slug))
            .await
    }
}
