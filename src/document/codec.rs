//! Serialization codec for the draft-js raw transport form
//!
//! The backend stores each document as the raw JSON emitted by the
//! original editor: an ordered block list plus an entity map keyed by
//! stringified entity numbers. Encoding is infallible; decoding
//! validates entity referential integrity and fails with
//! [`AvenueError::MalformedDocument`] on a dangling reference instead of
//! silently dropping the block.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{Block, Document, Entity, EntityKey};
use crate::error::{AvenueError, Result};

/// Transport form of one document
///
/// Matches the shape `{blocks: [...], entityMap: {"0": {...}}}`. Block
/// and entity payloads reuse the model types, which already carry the
/// wire field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Ordered block list
    pub blocks: Vec<Block>,
    /// Entity map keyed by entity number
    #[serde(rename = "entityMap", default)]
    pub entity_map: BTreeMap<EntityKey, Entity>,
}

/// Encode a document into its transport form
pub fn encode(document: &Document) -> RawDocument {
    RawDocument {
        blocks: document.blocks.clone(),
        entity_map: document.entities.clone(),
    }
}

/// Decode a transport document, validating entity references
///
/// Key-generation counters are rebuilt past the highest key present so
/// entities created after a decode stay monotonic.
///
/// # Errors
///
/// Returns [`AvenueError::MalformedDocument`] when any block's entity
/// range references a key absent from the entity map.
pub fn decode(raw: RawDocument) -> Result<Document> {
    for block in &raw.blocks {
        for range in &block.entity_ranges {
            if !raw.entity_map.contains_key(&range.key) {
                return Err(AvenueError::MalformedDocument(format!(
                    "block \"{}\" references entity {} absent from the entity map",
                    block.key, range.key
                )));
            }
        }
    }

    let next_entity_key = raw
        .entity_map
        .keys()
        .map(|key| key.0 + 1)
        .max()
        .unwrap_or(0);

    Ok(Document {
        next_entity_key,
        next_block_key: raw.blocks.len() as u64,
        blocks: raw.blocks,
        entities: raw.entity_map,
    })
}

impl Document {
    /// Serialize to the JSON string form the backend transports
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&encode(self))?)
    }

    /// Deserialize from the JSON string form the backend transports
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::Json`] on invalid JSON and
    /// [`AvenueError::MalformedDocument`] on a dangling entity
    /// reference.
    pub fn from_json(json: &str) -> Result<Self> {
        decode(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        BlockType, ImageData, InlineStyle, Position, Selection,
    };

    fn sample_document() -> Document {
        let mut document = Document::from_plain_text("Title line\nbody text");
        document.toggle_block_type(
            Selection::caret(Position::block_start(0)),
            BlockType::HeaderOne,
        );
        document.toggle_inline_style(
            Selection::new(
                Position { block: 1, offset: 0 },
                Position { block: 1, offset: 4 },
            ),
            InlineStyle::Bold,
        );
        let key = document.create_image_entity(ImageData {
            src: "data:image/png;base64,AAAA".to_string(),
            width: Some(200.0),
            height: Some(200.0),
            left: Some(0.0),
            top: Some(0.0),
        });
        document
            .insert_atomic_block(Position { block: 1, offset: 4 }, key, " ")
            .unwrap();
        document
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let document = sample_document();
        let decoded = decode(encode(&document)).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_json_round_trip() {
        let document = sample_document();
        let json = document.to_json().unwrap();
        let decoded = Document::from_json(&json).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_wire_field_names() {
        let document = sample_document();
        let json = document.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let block = &value["blocks"][0];
        assert_eq!(block["type"], "header-one");
        assert!(block["inlineStyleRanges"].is_array());
        assert!(block["entityRanges"].is_array());

        let entity = &value["entityMap"]["0"];
        assert_eq!(entity["type"], "IMAGE");
        assert_eq!(entity["mutability"], "MUTABLE");
        assert_eq!(entity["data"]["width"], 200.0);
    }

    #[test]
    fn test_dangling_entity_reference_fails_decode() {
        let json = r#"{
            "blocks": [
                {"key": "a", "text": " ", "type": "atomic", "depth": 0,
                 "inlineStyleRanges": [],
                 "entityRanges": [{"offset": 0, "length": 1, "key": 1}]}
            ],
            "entityMap": {}
        }"#;
        let err = Document::from_json(json).unwrap_err();
        assert!(matches!(err, AvenueError::MalformedDocument(_)));
    }

    #[test]
    fn test_invalid_json_fails_decode() {
        let err = Document::from_json("not json").unwrap_err();
        assert!(matches!(err, AvenueError::Json(_)));
    }

    #[test]
    fn test_unknown_block_type_fails_decode() {
        let json = r#"{
            "blocks": [{"key": "a", "text": "x", "type": "sidebar", "depth": 0,
                        "inlineStyleRanges": [], "entityRanges": []}],
            "entityMap": {}
        }"#;
        assert!(Document::from_json(json).is_err());
    }

    #[test]
    fn test_decode_accepts_editor_emitted_raw() {
        // Shape as emitted by the original editor, including the block
        // data object this model does not track.
        let json = r#"{
            "blocks": [
                {"key": "5u3qd", "text": "hello", "type": "unstyled",
                 "depth": 0,
                 "inlineStyleRanges": [{"offset": 0, "length": 5, "style": "BOLD"}],
                 "entityRanges": [], "data": {}}
            ],
            "entityMap": {}
        }"#;
        let document = Document::from_json(json).unwrap();
        assert_eq!(document.blocks()[0].text, "hello");
        assert_eq!(
            document.blocks()[0].inline_style_ranges[0].style,
            InlineStyle::Bold
        );
    }

    #[test]
    fn test_entity_keys_stay_monotonic_after_decode() {
        let document = sample_document();
        let mut decoded = decode(encode(&document)).unwrap();
        let fresh = decoded.create_image_entity(ImageData {
            src: "y".to_string(),
            width: None,
            height: None,
            left: None,
            top: None,
        });
        assert_eq!(fresh, EntityKey(1));
    }

    #[test]
    fn test_orphan_entity_survives_round_trip() {
        // An entity nothing references is legal and must not be lost.
        let mut document = Document::from_plain_text("text");
        document.create_image_entity(ImageData {
            src: "orphan".to_string(),
            width: None,
            height: None,
            left: None,
            top: None,
        });
        let decoded = decode(encode(&document)).unwrap();
        assert_eq!(decoded.entities().len(), 1);
        assert_eq!(decoded, document);
    }
}
