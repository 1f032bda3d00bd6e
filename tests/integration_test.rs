//! Integration tests for avenue-rs
//!
//! These tests verify the public API works correctly.
//! They do not require a reachable backend.

use std::sync::Arc;

use avenue_rs::{
    decode, encode, slug, AvenueClient, AvenueError, BackendConfig, BlockType, Category, Document,
    EditorSession, EditorStage, ImageData, InlineStyle, Position, Selection,
};

#[test]
fn test_backend_config_creation() {
    let config = BackendConfig::new("https://backend.example.com/");
    assert_eq!(config.origin, "https://backend.example.com");
    assert!(config.timeout.is_none());
}

#[test]
fn test_client_creation() {
    let config = Arc::new(BackendConfig::new("https://backend.example.com"));
    let client = AvenueClient::new(config).unwrap();
    assert_eq!(client.config().origin, "https://backend.example.com");
}

#[test]
fn test_error_display() {
    let err = AvenueError::EmptyTitle;
    assert_eq!(err.to_string(), "please enter a title");

    let err = AvenueError::EmptyDocument;
    assert_eq!(err.to_string(), "please write some content");

    let err = AvenueError::Status {
        code: 500,
        message: "Internal Server Error".to_string(),
    };
    assert_eq!(err.to_string(), "backend error 500: Internal Server Error");

    let err = AvenueError::SessionExpired;
    assert_eq!(err.to_string(), "session expired");

    let err = AvenueError::InvalidCategory("Gossip".to_string());
    assert_eq!(err.to_string(), "unknown category: Gossip");
}

#[test]
fn test_category_parsing() {
    assert_eq!("World-News".parse::<Category>().unwrap(), Category::WorldNews);
    assert!("world news".parse::<Category>().is_err());
}

#[test]
fn test_slug_round_trip() {
    let generated = slug::slug_for_title("My First Post");
    assert_eq!(generated, "My-First-Post");
    assert_eq!(slug::title_from_slug(&generated), "My First Post");
}

#[test]
fn test_document_round_trip_through_public_api() {
    let mut document = Document::from_plain_text("A heading\nand some body text");
    document.toggle_block_type(
        Selection::caret(Position::block_start(0)),
        BlockType::HeaderTwo,
    );
    document.toggle_inline_style(
        Selection::new(
            Position { block: 1, offset: 0 },
            Position { block: 1, offset: 3 },
        ),
        InlineStyle::Bold,
    );
    let key = document.create_image_entity(ImageData {
        src: "data:image/png;base64,AAAA".to_string(),
        width: Some(320.0),
        height: Some(240.0),
        left: Some(0.0),
        top: Some(0.0),
    });
    document
        .insert_atomic_block(Position { block: 1, offset: 3 }, key, " ")
        .unwrap();

    let decoded = decode(encode(&document)).unwrap();
    assert_eq!(decoded, document);

    let json = document.to_json().unwrap();
    assert_eq!(Document::from_json(&json).unwrap(), document);
}

#[test]
fn test_empty_document_gate() {
    assert!(Document::new().is_empty());
    assert!(!Document::from_plain_text("a").is_empty());
}

#[test]
fn test_editor_session_starts_new_and_empty() {
    let session = EditorSession::new();
    assert_eq!(session.stage(), EditorStage::New);
    assert!(session.content_is_empty());
}
