#![doc = include_str!("../README.md")]

/// Persisted article types and submission payloads
pub mod article;
mod client;
mod config;
/// Rich-text document model and transport codec
pub mod document;
mod editor;
mod error;
/// Title/slug mapping for public article links
pub mod slug;

pub use article::{
    Article, ArticleId, ArticleKind, ArticleSubmission, AuthorInfo, CategorizedFeed, Category,
    Thumbnail,
};
pub use client::{AvenueClient, Promotion, SessionData};
pub use config::BackendConfig;
pub use document::{
    constrain_resize, decode, encode, Block, BlockType, Document, Entity, EntityKey, EntityKind,
    EntityRange, ImageData, ImagePatch, InlineStyle, Mutability, Position, RawDocument, Selection,
    StyleRange,
};
pub use editor::{EditorSession, EditorStage};
pub use error::{AvenueError, Result};
