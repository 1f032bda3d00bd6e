//! Document type definitions
//!
//! This module contains the core data structures for representing one
//! rich-text document: an ordered sequence of typed blocks plus a map of
//! embedded entities (images) referenced by atomic blocks.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural role of one document block
///
/// Wire names match the draft-js raw form stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    /// Plain paragraph
    #[serde(rename = "unstyled")]
    Unstyled,
    /// Level-1 heading
    #[serde(rename = "header-one")]
    HeaderOne,
    /// Level-2 heading
    #[serde(rename = "header-two")]
    HeaderTwo,
    /// Level-3 heading
    #[serde(rename = "header-three")]
    HeaderThree,
    /// Level-4 heading
    #[serde(rename = "header-four")]
    HeaderFour,
    /// Level-5 heading
    #[serde(rename = "header-five")]
    HeaderFive,
    /// Level-6 heading
    #[serde(rename = "header-six")]
    HeaderSix,
    /// Block quotation
    #[serde(rename = "blockquote")]
    Blockquote,
    /// Bulleted list item
    #[serde(rename = "unordered-list-item")]
    UnorderedListItem,
    /// Numbered list item
    #[serde(rename = "ordered-list-item")]
    OrderedListItem,
    /// Preformatted code block
    #[serde(rename = "code-block")]
    CodeBlock,
    /// Non-text block holding exactly one entity reference
    #[serde(rename = "atomic")]
    Atomic,
}

impl BlockType {
    /// Whether this type participates in list nesting (carries depth)
    pub fn is_list(self) -> bool {
        matches!(self, Self::UnorderedListItem | Self::OrderedListItem)
    }
}

/// Inline formatting applied over a character span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineStyle {
    /// Bold text
    #[serde(rename = "BOLD")]
    Bold,
    /// Italic text
    #[serde(rename = "ITALIC")]
    Italic,
    /// Underlined text
    #[serde(rename = "UNDERLINE")]
    Underline,
    /// Monospace text
    #[serde(rename = "CODE")]
    Code,
}

/// One styled span inside a block
///
/// Offsets and lengths are measured in UTF-16 code units, matching the
/// editor that produced the stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRange {
    /// Span start
    pub offset: usize,
    /// Span length
    pub length: usize,
    /// Style applied over the span
    pub style: InlineStyle,
}

/// Identifier of one entity, unique within a document
///
/// Keys are assigned monotonically at entity creation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityKey(pub u64);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entity reference inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    /// Span start
    pub offset: usize,
    /// Span length (the single-space placeholder of an atomic block is 1)
    pub length: usize,
    /// Referenced entity; must resolve in the document's entity map
    pub key: EntityKey,
}

/// Kind of an embedded entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// An embedded image
    #[serde(rename = "IMAGE")]
    Image,
}

/// Whether entity data may change after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    /// Entity data may be updated in place (image resize/reposition)
    #[serde(rename = "MUTABLE")]
    Mutable,
}

/// Geometry and source of an embedded image
///
/// `None` fields mean the value was never set, which renderers map to
/// their own defaults; they are distinct from an explicit size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image source: a data-URL for freshly pasted images, a remote URL
    /// for images already stored by the backend
    pub src: String,
    /// Display width in CSS pixels
    #[serde(default)]
    pub width: Option<f64>,
    /// Display height in CSS pixels
    #[serde(default)]
    pub height: Option<f64>,
    /// Horizontal offset in CSS pixels
    #[serde(default)]
    pub left: Option<f64>,
    /// Vertical offset in CSS pixels
    #[serde(default)]
    pub top: Option<f64>,
}

/// Partial update of [`ImageData`]
///
/// `None` fields are left unchanged by [`Document::update_entity_data`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    /// Replacement source URL
    pub src: Option<String>,
    /// New display width
    pub width: Option<f64>,
    /// New display height
    pub height: Option<f64>,
    /// New horizontal offset
    pub left: Option<f64>,
    /// New vertical offset
    pub top: Option<f64>,
}

/// An embedded non-text resource referenced by an atomic block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity kind (presently always IMAGE)
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Mutability contract (presently always MUTABLE)
    pub mutability: Mutability,
    /// Entity payload
    pub data: ImageData,
}

impl Entity {
    /// A mutable image entity with the given payload
    pub fn image(data: ImageData) -> Self {
        Self {
            kind: EntityKind::Image,
            mutability: Mutability::Mutable,
            data,
        }
    }
}

/// One structural unit of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Opaque block key; unique within the document, may be regenerated
    /// across encode/decode cycles
    pub key: String,
    /// Literal text content (empty except for a placeholder space in
    /// atomic blocks)
    pub text: String,
    /// Structural role
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// List nesting level (0 for non-list blocks)
    #[serde(default)]
    pub depth: u8,
    /// Formatting spans, in insertion order
    #[serde(default)]
    pub inline_style_ranges: Vec<StyleRange>,
    /// Entity references (a single one for atomic blocks)
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
}

impl Block {
    /// An empty unstyled block with the given key
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: String::new(),
            block_type: BlockType::Unstyled,
            depth: 0,
            inline_style_ranges: Vec::new(),
            entity_ranges: Vec::new(),
        }
    }

    /// Length of the block text in UTF-16 code units
    pub fn len_utf16(&self) -> usize {
        self.text.encode_utf16().count()
    }
}

/// An in-memory rich-text document: ordered blocks plus an entity map
///
/// A new document holds a single empty unstyled block, like a freshly
/// opened editor. Mutation operations live in the `editing` module; the
/// transport mapping lives in the `codec` module.
#[must_use]
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) entities: BTreeMap<EntityKey, Entity>,
    pub(crate) next_entity_key: u64,
    pub(crate) next_block_key: u64,
}

impl Document {
    /// An empty document: one unstyled block with no text, no entities
    pub fn new() -> Self {
        let mut document = Self {
            blocks: Vec::new(),
            entities: BTreeMap::new(),
            next_entity_key: 0,
            next_block_key: 0,
        };
        let key = document.fresh_block_key();
        document.blocks.push(Block::empty(key));
        document
    }

    /// A document built from plain text, one unstyled block per line
    pub fn from_plain_text(text: &str) -> Self {
        let mut document = Self::new();
        document.append_plain_text(text);
        document
    }

    /// Append plain text, one unstyled block per line
    ///
    /// The first line fills the trailing block if it is still empty, so
    /// `Document::new()` followed by `append_plain_text("x")` yields a
    /// single block.
    pub fn append_plain_text(&mut self, text: &str) {
        for line in text.split('\n') {
            let reuse_trailing = self
                .blocks
                .last()
                .is_some_and(|b| b.text.is_empty() && b.block_type == BlockType::Unstyled);
            if reuse_trailing {
                if let Some(last) = self.blocks.last_mut() {
                    last.text = line.to_string();
                }
            } else {
                let key = self.fresh_block_key();
                let mut block = Block::empty(key);
                block.text = line.to_string();
                self.blocks.push(block);
            }
        }
    }

    /// Concatenated block text, newline-separated
    pub fn to_plain_text(&self) -> String {
        let texts: Vec<&str> = self.blocks.iter().map(|b| b.text.as_str()).collect();
        texts.join("\n")
    }

    /// The document's blocks, in order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The document's entity map
    pub fn entities(&self) -> &BTreeMap<EntityKey, Entity> {
        &self.entities
    }

    /// Look up one entity
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    /// Whether the document counts as empty for save gating: every block
    /// has empty trimmed text and the entity map is empty
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.text.trim().is_empty()) && self.entities.is_empty()
    }

    /// Next unused block key
    pub(crate) fn fresh_block_key(&mut self) -> String {
        loop {
            let candidate = format!("b{}", self.next_block_key);
            self.next_block_key += 1;
            if !self.blocks.iter().any(|b| b.key == candidate) {
                return candidate;
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Semantic equality: block-for-block and entity-for-entity; key
/// generation counters are not part of a document's identity.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks && self.entities == other.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_shape() {
        let document = Document::new();
        assert_eq!(document.blocks().len(), 1);
        assert_eq!(document.blocks()[0].block_type, BlockType::Unstyled);
        assert!(document.blocks()[0].text.is_empty());
        assert!(document.entities().is_empty());
    }

    #[test]
    fn test_is_empty_for_blank_document() {
        assert!(Document::new().is_empty());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let document = Document::from_plain_text("   \n\t");
        assert!(document.is_empty());
    }

    #[test]
    fn test_single_character_is_not_empty() {
        let document = Document::from_plain_text("a");
        assert!(!document.is_empty());
    }

    #[test]
    fn test_append_fills_trailing_empty_block() {
        let mut document = Document::new();
        document.append_plain_text("hello");
        assert_eq!(document.blocks().len(), 1);
        assert_eq!(document.blocks()[0].text, "hello");
    }

    #[test]
    fn test_from_plain_text_splits_lines() {
        let document = Document::from_plain_text("one\ntwo");
        assert_eq!(document.blocks().len(), 2);
        assert_eq!(document.to_plain_text(), "one\ntwo");
    }

    #[test]
    fn test_block_keys_unique() {
        let document = Document::from_plain_text("a\nb\nc");
        let mut keys: Vec<&str> = document.blocks().iter().map(|b| b.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_is_list() {
        assert!(BlockType::OrderedListItem.is_list());
        assert!(BlockType::UnorderedListItem.is_list());
        assert!(!BlockType::Blockquote.is_list());
        assert!(!BlockType::Atomic.is_list());
    }
}
