//! Rich-text document model and its transport codec
//!
//! A [`Document`] is an ordered sequence of typed [`Block`]s plus a map
//! of embedded [`Entity`] values (images) referenced by atomic blocks.
//! Mutation follows cursor-based editing semantics; the codec converts
//! to and from the draft-js raw JSON form the backend stores.
//!
//! Invariant: every entity reference in a block resolves in the entity
//! map. The mutation API maintains it by construction; [`codec::decode`]
//! enforces it on untrusted input.

/// Transport mapping to the draft-js raw form
pub mod codec;
mod editing;
mod types;

pub use codec::{decode, encode, RawDocument};
pub use editing::{constrain_resize, Position, Selection};
pub use types::{
    Block, BlockType, Document, Entity, EntityKey, EntityKind, EntityRange, ImageData,
    ImagePatch, InlineStyle, Mutability, StyleRange,
};
