//! Article create, update, delete, and draft promotion
//!
//! Every submission travels as one multipart form: the two documents as
//! JSON-encoded string fields, scalar metadata as text fields, and the
//! thumbnail as either a file part (fresh upload) or a stored-path text
//! field. Creates carry the author username; updates target a record id
//! and omit it.

use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::AvenueClient;
use crate::article::{ArticleId, ArticleSubmission, Category, Thumbnail};
use crate::error::{AvenueError, Result};

impl AvenueClient {
    /// Create a published article; returns the new record id
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::SessionExpired`] - The backend rejected the cookie
    /// - [`crate::AvenueError::Status`] - The backend refused the submission
    /// - [`crate::AvenueError::MissingField`] - The response lacked the new id
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn create_completed(
        &self,
        username: &str,
        submission: &ArticleSubmission,
    ) -> Result<ArticleId> {
        debug!(title = %submission.title, "creating completed article");
        self.create_at("/", username, submission).await
    }

    /// Create a draft; returns the new record id
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AvenueClient::create_completed`].
    pub async fn create_draft(
        &self,
        username: &str,
        submission: &ArticleSubmission,
    ) -> Result<ArticleId> {
        debug!(title = %submission.title, "creating draft article");
        self.create_at("/insert-draft-article/", username, submission)
            .await
    }

    /// Update an existing draft in place
    ///
    /// Serialized against other mutations of the same article id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`crate::AvenueError::SessionExpired`] - The backend rejected the cookie
    /// - [`crate::AvenueError::Status`] - No such draft, or the submission was refused
    /// - [`crate::AvenueError::Http`] - Transport failure
    pub async fn update_draft(&self, id: ArticleId, submission: &ArticleSubmission) -> Result<()> {
        let lock = self.article_lock(id).await;
        let _guard = lock.lock().await;
        debug!(%id, "updating draft article");
        self.update_at(&format!("/update-draft-article/{id}/"), submission)
            .await
    }

    /// Update an existing published article in place
    ///
    /// Serialized against other mutations of the same article id.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AvenueClient::update_draft`].
    pub async fn update_completed(
        &self,
        id: ArticleId,
        submission: &ArticleSubmission,
    ) -> Result<()> {
        let lock = self.article_lock(id).await;
        let _guard = lock.lock().await;
        debug!(%id, "updating completed article");
        self.update_at(&format!("/update-completed-article/{id}/"), submission)
            .await
    }

    /// Delete a draft
    ///
    /// Idempotent from the caller's perspective: a non-success status
    /// (e.g., the record is already gone) is logged and treated as a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AvenueError::Http`] only on transport failure.
    pub async fn delete_draft(&self, id: ArticleId) -> Result<()> {
        let lock = self.article_lock(id).await;
        let _guard = lock.lock().await;
        let status = self
            .send_delete(&format!("/delete-draft-article/{id}/"))
            .await?;
        self.log_delete_status(id, status).await;
        Ok(())
    }

    /// Delete a published article
    ///
    /// Same idempotent contract as [`AvenueClient::delete_draft`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::AvenueError::Http`] only on transport failure.
    pub async fn delete_completed(&self, id: ArticleId) -> Result<()> {
        let lock = self.article_lock(id).await;
        let _guard = lock.lock().await;
        let status = self
            .send_delete(&format!("/delete-completed-article/{id}/"))
            .await?;
        self.log_delete_status(id, status).await;
        Ok(())
    }

    /// Publish a draft: create the completed record, then delete the draft
    ///
    /// The completed article is created first so a failure at any point
    /// leaves at least one copy of the content on the backend. If the
    /// compensating draft delete fails, the returned [`Promotion`] still
    /// carries the new completed id plus the leftover draft id as a
    /// resume token; retry the cleanup with [`Promotion::finish`] or
    /// [`AvenueClient::delete_draft`].
    ///
    /// # Errors
    ///
    /// Returns an error only when the completed article could not be
    /// created; the draft is untouched in that case.
    pub async fn promote_draft(
        &self,
        draft_id: ArticleId,
        username: &str,
        submission: &ArticleSubmission,
    ) -> Result<Promotion> {
        let lock = self.article_lock(draft_id).await;
        let _guard = lock.lock().await;
        debug!(%draft_id, "promoting draft to completed article");

        let completed_id = self.create_completed(username, submission).await?;

        let leftover_draft = match self
            .send_delete(&format!("/delete-draft-article/{draft_id}/"))
            .await
        {
            Ok(status) if status.is_success() => None,
            Ok(status) => {
                warn!(
                    %draft_id,
                    %completed_id,
                    code = status.as_u16(),
                    "draft left behind after promotion"
                );
                Some(draft_id)
            }
            Err(err) => {
                warn!(
                    %draft_id,
                    %completed_id,
                    error = %err,
                    "draft left behind after promotion"
                );
                Some(draft_id)
            }
        };

        Ok(Promotion {
            completed_id,
            leftover_draft,
        })
    }

    async fn create_at(
        &self,
        path: &str,
        username: &str,
        submission: &ArticleSubmission,
    ) -> Result<ArticleId> {
        let form = submission_form(submission, Some(username))?;
        let response = self
            .http()
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        let body: serde_json::Value = response.json().await?;
        let id = body
            .get("id")
            .and_then(|v| v.as_i64())
            .ok_or(AvenueError::MissingField("id"))?;
        Ok(ArticleId(id))
    }

    async fn update_at(&self, path: &str, submission: &ArticleSubmission) -> Result<()> {
        let form = submission_form(submission, None)?;
        let response = self
            .http()
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.fail_status(response).await);
        }
        Ok(())
    }

    async fn send_delete(&self, path: &str) -> Result<reqwest::StatusCode> {
        let response = self.http().delete(self.url(path)).send().await?;
        Ok(response.status())
    }

    async fn log_delete_status(&self, id: ArticleId, status: reqwest::StatusCode) {
        if !status.is_success() {
            warn!(%id, code = status.as_u16(), "delete did not succeed, treating as no-op");
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                self.clear_session().await;
            }
        }
    }
}

/// Outcome of a draft promotion
///
/// Doubles as the resume token for an incomplete promotion: when
/// `leftover_draft` is set, the completed article exists but the draft
/// it replaced is still on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Promotion {
    /// Id of the newly created completed article
    pub completed_id: ArticleId,
    /// Draft that still needs its compensating delete, if any
    pub leftover_draft: Option<ArticleId>,
}

impl Promotion {
    /// Whether the draft cleanup still needs to run
    pub fn is_complete(&self) -> bool {
        self.leftover_draft.is_none()
    }

    /// Retry the compensating draft delete if it is still pending
    ///
    /// # Errors
    ///
    /// Returns [`crate::AvenueError::Http`] on transport failure; the
    /// token stays pending in that case.
    pub async fn finish(&mut self, client: &AvenueClient) -> Result<()> {
        if let Some(draft_id) = self.leftover_draft {
            client.delete_draft(draft_id).await?;
            self.leftover_draft = None;
        }
        Ok(())
    }
}

/// Assemble the multipart form for one submission
fn submission_form(submission: &ArticleSubmission, username: Option<&str>) -> Result<Form> {
    let mut form = Form::new()
        .text("contents", submission.body.to_json()?)
        .text("title", submission.title.clone());
    if let Some(username) = username {
        form = form.text("username", username.to_string());
    }
    form = match &submission.thumbnail {
        Thumbnail::File {
            bytes,
            filename,
            mime,
        } => {
            let part = Part::bytes(bytes.clone())
                .file_name(filename.clone())
                .mime_str(mime)?;
            form.part("thumbnail", part)
        }
        Thumbnail::Path(path) => form.text("thumbnail", path.clone()),
        Thumbnail::None => form,
    };
    form = form.text(
        "category",
        submission
            .category
            .map(Category::as_str)
            .unwrap_or_default()
            .to_string(),
    );
    if let Some(filename) = &submission.filename {
        form = form.text("filename", filename.clone());
    }
    form = form.text("description", submission.description.to_json()?);
    Ok(form)
}
