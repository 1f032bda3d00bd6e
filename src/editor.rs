//! Editing sessions: one article's in-memory state and its lifecycle
//!
//! An [`EditorSession`] holds the title, category, thumbnail, and the
//! two rich-text documents while the author works, and drives the
//! draft/published lifecycle against the protocol client:
//!
//! ```text
//! New --save_draft--> Draft --save_draft--> Draft
//! New --publish-----> Completed
//! Draft --publish---> Completed        (promotion saga)
//! Completed --save_draft/publish--> Completed   (in-place edit)
//! ```
//!
//! Validation gates run before any network call: publishing requires a
//! title, and every save requires at least one of body/description to
//! be non-empty.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use crate::article::{
    Article, ArticleId, ArticleKind, ArticleSubmission, Category, Thumbnail,
};
use crate::client::AvenueClient;
use crate::document::{constrain_resize, Document, EntityKey, ImageData, ImagePatch, Position};
use crate::error::{AvenueError, Result};

/// Default edge length for a freshly inserted image, in CSS pixels
const DEFAULT_IMAGE_EDGE: f64 = 200.0;

/// Lifecycle state of the article being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStage {
    /// Nothing persisted yet
    New,
    /// Backing draft record exists
    Draft(ArticleId),
    /// Backing completed record exists
    Completed(ArticleId),
}

/// In-memory editing state for one article
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use avenue_rs::{AvenueClient, BackendConfig, Category, EditorSession};
///
/// # async fn example() -> avenue_rs::Result<()> {
/// let client = AvenueClient::new(Arc::new(BackendConfig::new(
///     "https://backend.example.com",
/// )))?;
///
/// let mut session = EditorSession::new();
/// session.set_title("My First Post");
/// session.set_category(Category::Science);
/// session.body_mut().append_plain_text("Tell a story...");
///
/// session.save_draft(&client).await?;
/// let article_id = session.publish(&client).await?;
/// println!("published as {article_id}");
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct EditorSession {
    stage: EditorStage,
    title: String,
    category: Option<Category>,
    thumbnail: Thumbnail,
    filename: Option<String>,
    body: Document,
    description: Document,
}

impl EditorSession {
    /// Start a session for a brand-new article
    pub fn new() -> Self {
        Self {
            stage: EditorStage::New,
            title: String::new(),
            category: None,
            thumbnail: Thumbnail::None,
            filename: None,
            body: Document::new(),
            description: Document::new(),
        }
    }

    /// Resume editing an existing article
    ///
    /// The stored thumbnail path, if any, is carried over as
    /// [`Thumbnail::Path`] so saving without touching the image keeps it.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::MissingField`] if the article has no id;
    /// only records fetched from an authoring listing can be edited.
    pub fn open(article: Article, kind: ArticleKind) -> Result<Self> {
        let id = article.id.ok_or(AvenueError::MissingField("id"))?;
        let stage = match kind {
            ArticleKind::Draft => EditorStage::Draft(id),
            ArticleKind::Completed => EditorStage::Completed(id),
        };
        let thumbnail = match article.thumbnail {
            Some(path) => Thumbnail::Path(path),
            None => Thumbnail::None,
        };
        Ok(Self {
            stage,
            title: article.title,
            category: article.category,
            thumbnail,
            filename: article.filename,
            body: article.body,
            description: article.description,
        })
    }

    /// Current lifecycle stage
    pub fn stage(&self) -> EditorStage {
        self.stage
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Current category
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Set the category
    pub fn set_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    /// Attach a new thumbnail image file
    pub fn attach_thumbnail(
        &mut self,
        bytes: Vec<u8>,
        filename: impl Into<String>,
        mime: impl Into<String>,
    ) {
        let filename = filename.into();
        self.thumbnail = Thumbnail::File {
            bytes,
            filename: filename.clone(),
            mime: mime.into(),
        };
        self.filename = Some(filename);
    }

    /// The body document
    pub fn body(&self) -> &Document {
        &self.body
    }

    /// Mutable access to the body document
    pub fn body_mut(&mut self) -> &mut Document {
        &mut self.body
    }

    /// The description document
    pub fn description(&self) -> &Document {
        &self.description
    }

    /// Mutable access to the description document
    pub fn description_mut(&mut self) -> &mut Document {
        &mut self.description
    }

    /// Paste an image into the body at the caret
    ///
    /// The bytes become a base64 data-URL entity with the default
    /// 200×200 geometry, referenced by a new atomic block.
    ///
    /// # Errors
    ///
    /// Propagates [`AvenueError::UnknownEntity`] from the document
    /// model; with a freshly created entity this does not occur.
    pub fn insert_image(&mut self, at: Position, bytes: &[u8], mime: &str) -> Result<EntityKey> {
        let src = format!("data:{mime};base64,{}", BASE64.encode(bytes));
        let key = self.body.create_image_entity(ImageData {
            src,
            width: Some(DEFAULT_IMAGE_EDGE),
            height: Some(DEFAULT_IMAGE_EDGE),
            left: Some(0.0),
            top: Some(0.0),
        });
        self.body.insert_atomic_block(at, key, " ")?;
        Ok(key)
    }

    /// Apply a resize gesture to an embedded image
    ///
    /// The requested size is clamped to the aspect-locked range between
    /// the 50×50 minimum and the editor viewport, then merged into the
    /// entity data in place. Returns the size actually applied.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::UnknownEntity`] if `key` does not resolve.
    pub fn resize_image(
        &mut self,
        key: EntityKey,
        width: f64,
        height: f64,
        viewport: (f64, f64),
    ) -> Result<(f64, f64)> {
        let (width, height) = constrain_resize(width, height, viewport);
        self.body.update_entity_data(
            key,
            &ImagePatch {
                width: Some(width),
                height: Some(height),
                ..ImagePatch::default()
            },
        )?;
        Ok((width, height))
    }

    /// Whether both documents are empty (the save gate)
    pub fn content_is_empty(&self) -> bool {
        self.body.is_empty() && self.description.is_empty()
    }

    /// Save the session as a draft, or update the backing record
    ///
    /// No network call is made unless the content gate passes. A session
    /// backed by a completed article stays completed; its record is
    /// edited in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`AvenueError::EmptyDocument`] - Both documents are empty
    /// - Any failure of the underlying protocol operation
    pub async fn save_draft(&mut self, client: &AvenueClient) -> Result<ArticleId> {
        if self.content_is_empty() {
            return Err(AvenueError::EmptyDocument);
        }
        let submission = self.submission();
        match self.stage {
            EditorStage::New => {
                let username = client.session_data().await?.username;
                let id = client.create_draft(&username, &submission).await?;
                debug!(%id, "session now backed by draft");
                self.stage = EditorStage::Draft(id);
                Ok(id)
            }
            EditorStage::Draft(id) => {
                client.update_draft(id, &submission).await?;
                Ok(id)
            }
            EditorStage::Completed(id) => {
                client.update_completed(id, &submission).await?;
                Ok(id)
            }
        }
    }

    /// Publish the session as a completed article
    ///
    /// Gates run in order before any network call: title first, then
    /// content. A draft-backed session goes through the promotion saga;
    /// a completed-backed session is edited in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`AvenueError::EmptyTitle`] - The title is empty
    /// - [`AvenueError::EmptyDocument`] - Both documents are empty
    /// - Any failure of the underlying protocol operation
    pub async fn publish(&mut self, client: &AvenueClient) -> Result<ArticleId> {
        if self.title.is_empty() {
            return Err(AvenueError::EmptyTitle);
        }
        if self.content_is_empty() {
            return Err(AvenueError::EmptyDocument);
        }
        let submission = self.submission();
        match self.stage {
            EditorStage::New => {
                let username = client.session_data().await?.username;
                let id = client.create_completed(&username, &submission).await?;
                debug!(%id, "session now backed by completed article");
                self.stage = EditorStage::Completed(id);
                Ok(id)
            }
            EditorStage::Draft(draft_id) => {
                let username = client.session_data().await?.username;
                let promotion = client
                    .promote_draft(draft_id, &username, &submission)
                    .await?;
                self.stage = EditorStage::Completed(promotion.completed_id);
                Ok(promotion.completed_id)
            }
            EditorStage::Completed(id) => {
                client.update_completed(id, &submission).await?;
                Ok(id)
            }
        }
    }

    /// Delete the backing record, consuming the session
    ///
    /// A session that was never saved has nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::Http`] on transport failure; a record that
    /// is already gone is not an error.
    pub async fn discard(self, client: &AvenueClient) -> Result<()> {
        match self.stage {
            EditorStage::New => Ok(()),
            EditorStage::Draft(id) => client.delete_draft(id).await,
            EditorStage::Completed(id) => client.delete_completed(id).await,
        }
    }

    fn submission(&self) -> ArticleSubmission {
        ArticleSubmission {
            title: self.title.clone(),
            category: self.category,
            thumbnail: self.thumbnail.clone(),
            filename: self.filename.clone(),
            body: self.body.clone(),
            description: self.description.clone(),
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = EditorSession::new();
        assert_eq!(session.stage(), EditorStage::New);
        assert!(session.content_is_empty());
        assert!(session.title().is_empty());
    }

    #[test]
    fn test_body_content_clears_gate() {
        let mut session = EditorSession::new();
        session.body_mut().append_plain_text("words");
        assert!(!session.content_is_empty());
    }

    #[test]
    fn test_description_alone_clears_gate() {
        let mut session = EditorSession::new();
        session.description_mut().append_plain_text("summary");
        assert!(!session.content_is_empty());
    }

    #[test]
    fn test_insert_image_builds_data_url() {
        let mut session = EditorSession::new();
        let key = session
            .insert_image(Position::block_start(0), &[0xDE, 0xAD], "image/png")
            .unwrap();
        let entity = session.body().entity(key).unwrap();
        assert!(entity.data.src.starts_with("data:image/png;base64,"));
        assert_eq!(entity.data.width, Some(200.0));
        // An embedded image counts as content even with no text.
        assert!(!session.content_is_empty());
    }

    #[test]
    fn test_resize_image_clamps_to_viewport() {
        let mut session = EditorSession::new();
        let key = session
            .insert_image(Position::block_start(0), &[1], "image/jpeg")
            .unwrap();
        let applied = session.resize_image(key, 4000.0, 4000.0, (800.0, 600.0)).unwrap();
        assert_eq!(applied, (600.0, 600.0));
        let entity = session.body().entity(key).unwrap();
        assert_eq!(entity.data.width, Some(600.0));
        assert_eq!(entity.data.height, Some(600.0));
    }

    #[test]
    fn test_attach_thumbnail_tracks_filename() {
        let mut session = EditorSession::new();
        session.attach_thumbnail(vec![1, 2, 3], "cover.png", "image/png");
        assert!(matches!(session.thumbnail, Thumbnail::File { .. }));
        assert_eq!(session.filename.as_deref(), Some("cover.png"));
    }

    #[test]
    fn test_open_requires_id() {
        let article = Article {
            id: None,
            title: "t".to_string(),
            author: None,
            category: None,
            thumbnail: None,
            filename: None,
            body: Document::new(),
            description: Document::new(),
            created_at: None,
        };
        assert!(matches!(
            EditorSession::open(article, ArticleKind::Completed).unwrap_err(),
            AvenueError::MissingField("id")
        ));
    }

    #[test]
    fn test_open_keeps_stored_thumbnail_path() {
        let article = Article {
            id: Some(ArticleId(9)),
            title: "t".to_string(),
            author: Some("ada".to_string()),
            category: Some(Category::General),
            thumbnail: Some("/media/thumbs/9.png".to_string()),
            filename: Some("nine.png".to_string()),
            body: Document::from_plain_text("body"),
            description: Document::new(),
            created_at: None,
        };
        let session = EditorSession::open(article, ArticleKind::Draft).unwrap();
        assert_eq!(session.stage(), EditorStage::Draft(ArticleId(9)));
        assert_eq!(
            session.thumbnail,
            Thumbnail::Path("/media/thumbs/9.png".to_string())
        );
    }
}
