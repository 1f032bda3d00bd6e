//! Client error types

use thiserror::Error;

/// Errors surfaced by the Article Avenue client
///
/// The first three variants cover the network-related failure kinds
/// (transport, non-success status, malformed body). Validation variants
/// (`EmptyTitle`, `EmptyDocument`) are raised before any network call and
/// carry the user-facing message as their `Display` text.
#[derive(Error, Debug)]
pub enum AvenueError {
    /// Network or transport failure underneath an HTTP call
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status
    #[error("backend error {code}: {message}")]
    Status {
        /// HTTP status code (e.g., 404, 500)
        code: u16,
        /// Status reason phrase, if any
        message: String,
    },

    /// Response body was not valid JSON of the expected shape
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed as JSON but a required field is missing
    #[error("response missing expected field `{0}`")]
    MissingField(&'static str),

    /// A document failed to decode from its transport form
    ///
    /// Raised when a block's entity reference does not resolve in the
    /// entity map. Decode fails outright rather than dropping the block,
    /// since dropping risks silent content loss.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An entity key that is not registered in the document
    #[error("unknown entity key: {0}")]
    UnknownEntity(u64),

    /// A category string outside the closed category set
    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// Publish attempted without a title
    #[error("please enter a title")]
    EmptyTitle,

    /// Save attempted while both body and description are empty
    #[error("please write some content")]
    EmptyDocument,

    /// The cookie-backed backend session is gone; sign in again
    #[error("session expired")]
    SessionExpired,
}

/// Result type alias using AvenueError
pub type Result<T> = std::result::Result<T, AvenueError>;
