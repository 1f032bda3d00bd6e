//! Persisted article types
//!
//! An article is the unit the backend stores: a title, a category, an
//! optional thumbnail, and two rich-text documents (body and
//! description). Articles exist as drafts (author-visible, mutable) or
//! completed articles (publicly readable). The wire shapes here absorb
//! the backend's field-name drift between endpoints (`username` vs
//! `author`, `tag` vs `category`, `created_at` vs `date`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{AvenueError, Result};

/// Backend identifier of one article record
///
/// Draft and completed records have independent id spaces; promotion
/// creates a new completed record rather than carrying the draft id
/// over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of article categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// General interest
    General,
    /// Sports
    Sports,
    /// Science
    Science,
    /// World news
    #[serde(rename = "World-News")]
    WorldNews,
}

impl Category {
    /// Wire name of the category
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Sports => "Sports",
            Self::Science => "Science",
            Self::WorldNews => "World-News",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AvenueError;

    /// Validate a category string at the boundary
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::InvalidCategory`] for anything outside the
    /// closed set.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "General" => Ok(Self::General),
            "Sports" => Ok(Self::Sports),
            "Science" => Ok(Self::Science),
            "World-News" => Ok(Self::WorldNews),
            other => Err(AvenueError::InvalidCategory(other.to_string())),
        }
    }
}

/// Lifecycle state of an article record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleKind {
    /// Visible only to its author, not yet published
    Draft,
    /// Published and publicly readable
    Completed,
}

/// Thumbnail attachment for a submission
///
/// The three cases are distinct on the wire: a fresh upload becomes a
/// multipart file part, an already-stored image path is sent back as a
/// string, and `None` omits the field entirely ("no image change").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Thumbnail {
    /// A new image file to upload
    File {
        /// Raw image bytes
        bytes: Vec<u8>,
        /// Original file name
        filename: String,
        /// MIME type (e.g., "image/png")
        mime: String,
    },
    /// Path of an image already stored by the backend
    Path(String),
    /// No thumbnail attached
    #[default]
    None,
}

/// One persisted article as returned by the backend
#[derive(Debug, Clone)]
pub struct Article {
    /// Record id; absent on the public single-article endpoint
    pub id: Option<ArticleId>,
    /// Article title
    pub title: String,
    /// Author's username
    pub author: Option<String>,
    /// Category; absent on the public single-article endpoint
    pub category: Option<Category>,
    /// Stored thumbnail path, if any
    pub thumbnail: Option<String>,
    /// Original thumbnail file name, if any
    pub filename: Option<String>,
    /// Rich-text body
    pub body: Document,
    /// Rich-text summary
    pub description: Document,
    /// Creation timestamp, if the endpoint reports one
    pub created_at: Option<DateTime<Utc>>,
}

/// Outbound payload shared by every create/update operation
#[derive(Debug, Clone, Default)]
pub struct ArticleSubmission {
    /// Article title
    pub title: String,
    /// Category; `None` is sent as the backend's empty-category marker
    pub category: Option<Category>,
    /// Thumbnail attachment
    pub thumbnail: Thumbnail,
    /// Thumbnail file name shown in the editor
    pub filename: Option<String>,
    /// Rich-text body
    pub body: Document,
    /// Rich-text summary
    pub description: Document,
}

/// Author profile as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorInfo {
    /// Display name
    pub name: String,
    /// Author biography (may contain markup)
    #[serde(rename = "author_desc")]
    pub description: String,
    /// Stored profile picture path, if any
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// The public home feed, grouped by category
#[derive(Debug, Clone)]
pub struct CategorizedFeed {
    /// Every published article
    pub all_articles: Vec<Article>,
    /// General category
    pub general: Vec<Article>,
    /// Sports category
    pub sports: Vec<Article>,
    /// World news category
    pub worldnews: Vec<Article>,
    /// Science category
    pub science: Vec<Article>,
}

/// Article shape on the wire; fields vary per endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct WireArticle {
    #[serde(default)]
    id: Option<i64>,
    title: String,
    #[serde(default, alias = "author")]
    username: Option<String>,
    #[serde(default, alias = "category")]
    tag: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    contents: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "date")]
    created_at: Option<DateTime<Utc>>,
}

impl WireArticle {
    /// Decode the JSON-string document fields and validate the category
    pub(crate) fn into_article(self) -> Result<Article> {
        let body = Document::from_json(&self.contents)?;
        let description = match self.description.as_deref() {
            Some(raw) if !raw.is_empty() => Document::from_json(raw)?,
            _ => Document::new(),
        };
        let category = match self.tag.as_deref() {
            Some("") | None => None,
            Some(tag) => Some(tag.parse()?),
        };
        Ok(Article {
            id: self.id.map(ArticleId),
            title: self.title,
            author: self.username,
            category,
            thumbnail: self.thumbnail,
            filename: self.filename,
            body,
            description,
            created_at: self.created_at,
        })
    }
}

/// Wire shape of the categorized home feed
#[derive(Debug, Deserialize)]
pub(crate) struct WireFeed {
    pub(crate) all_articles: Vec<WireArticle>,
    pub(crate) general: Vec<WireArticle>,
    pub(crate) sports: Vec<WireArticle>,
    pub(crate) worldnews: Vec<WireArticle>,
    pub(crate) science: Vec<WireArticle>,
}

impl WireFeed {
    pub(crate) fn into_feed(self) -> Result<CategorizedFeed> {
        fn convert(articles: Vec<WireArticle>) -> Result<Vec<Article>> {
            articles.into_iter().map(WireArticle::into_article).collect()
        }
        Ok(CategorizedFeed {
            all_articles: convert(self.all_articles)?,
            general: convert(self.general)?,
            sports: convert(self.sports)?,
            worldnews: convert(self.worldnews)?,
            science: convert(self.science)?,
        })
    }
}
