//! Cursor-based mutation operations on a document
//!
//! These mirror the edit gestures of a rich-text editor: toggling block
//! types and inline styles over a selection, inserting atomic image
//! blocks at the cursor, and updating entity data in place after a
//! resize gesture.

use super::types::{
    Block, BlockType, Document, Entity, EntityKey, EntityRange, ImageData, ImagePatch,
    InlineStyle, StyleRange,
};
use crate::error::{AvenueError, Result};

/// Minimum edge length for a resized image, in CSS pixels
const MIN_IMAGE_EDGE: f64 = 50.0;

/// Maximum list nesting depth
const MAX_LIST_DEPTH: u8 = 4;

/// A caret location: block index plus UTF-16 offset within the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Index into the document's block list
    pub block: usize,
    /// Offset within the block text, in UTF-16 code units
    pub offset: usize,
}

impl Position {
    /// Position at the start of the given block
    pub fn block_start(block: usize) -> Self {
        Self { block, offset: 0 }
    }
}

/// A selection between two carets; anchor and focus may be in either order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the selection currently ends
    pub focus: Position,
}

impl Selection {
    /// Selection spanning from `anchor` to `focus`
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection at a single caret
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    /// Anchor and focus in document order
    pub fn normalized(self) -> (Position, Position) {
        let forward = (self.anchor.block, self.anchor.offset)
            <= (self.focus.block, self.focus.offset);
        if forward {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    /// Whether the selection spans no characters
    pub fn is_collapsed(self) -> bool {
        self.anchor == self.focus
    }
}

/// Aspect-locked clamp of a resize gesture
///
/// The result keeps the requested aspect ratio, never drops an edge
/// below 50px, and never exceeds the editor viewport. When the viewport
/// is smaller than the minimum, the viewport bound wins.
pub fn constrain_resize(width: f64, height: f64, viewport: (f64, f64)) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (MIN_IMAGE_EDGE, MIN_IMAGE_EDGE);
    }
    let min_scale = (MIN_IMAGE_EDGE / width).max(MIN_IMAGE_EDGE / height);
    let max_scale = (viewport.0 / width).min(viewport.1 / height);
    let scale = if max_scale < min_scale {
        max_scale
    } else {
        1.0_f64.clamp(min_scale, max_scale)
    };
    (width * scale, height * scale)
}

impl Document {
    /// Change the type of every block intersecting the selection
    ///
    /// Toggling a type all intersected blocks already have reverts them
    /// to `Unstyled`. Leaving a list type resets the nesting depth.
    pub fn toggle_block_type(&mut self, selection: Selection, block_type: BlockType) {
        if self.blocks.is_empty() {
            return;
        }
        let (start, end) = selection.normalized();
        let last = end.block.min(self.blocks.len() - 1);
        let first = start.block.min(last);

        let uniform = self.blocks[first..=last]
            .iter()
            .all(|b| b.block_type == block_type);
        let target = if uniform {
            BlockType::Unstyled
        } else {
            block_type
        };

        for block in &mut self.blocks[first..=last] {
            block.block_type = target;
            if !target.is_list() {
                block.depth = 0;
            }
        }
    }

    /// Toggle an inline style over the selection
    ///
    /// If the style already covers every selected character it is
    /// removed from the selection; otherwise it is applied across it.
    /// Newly applied ranges are appended, preserving insertion order.
    /// A collapsed selection is a no-op.
    pub fn toggle_inline_style(&mut self, selection: Selection, style: InlineStyle) {
        if self.blocks.is_empty() || selection.is_collapsed() {
            return;
        }
        let (start, end) = selection.normalized();
        let last = end.block.min(self.blocks.len() - 1);
        let first = start.block.min(last);

        let spans: Vec<(usize, usize, usize)> = (first..=last)
            .filter_map(|index| {
                let block = &self.blocks[index];
                let from = if index == start.block { start.offset } else { 0 };
                let to = if index == end.block {
                    end.offset.min(block.len_utf16())
                } else {
                    block.len_utf16()
                };
                (from < to).then_some((index, from, to))
            })
            .collect();
        if spans.is_empty() {
            return;
        }

        let uniform = spans
            .iter()
            .all(|&(index, from, to)| style_covers(&self.blocks[index], style, from, to));

        for (index, from, to) in spans {
            let block = &mut self.blocks[index];
            if uniform {
                remove_style(block, style, from, to);
            } else if !style_covers(block, style, from, to) {
                block.inline_style_ranges.push(StyleRange {
                    offset: from,
                    length: to - from,
                    style,
                });
            }
        }
    }

    /// Bump the list nesting depth of selected list items
    ///
    /// Depth is clamped to 0..=4; non-list blocks are untouched.
    pub fn adjust_list_depth(&mut self, selection: Selection, delta: i8) {
        if self.blocks.is_empty() {
            return;
        }
        let (start, end) = selection.normalized();
        let last = end.block.min(self.blocks.len() - 1);
        let first = start.block.min(last);
        for block in &mut self.blocks[first..=last] {
            if block.block_type.is_list() {
                let depth = (block.depth as i8 + delta).clamp(0, MAX_LIST_DEPTH as i8);
                block.depth = depth as u8;
            }
        }
    }

    /// Register a new image entity and return its key
    ///
    /// Keys are assigned monotonically and never reused within one
    /// document.
    pub fn create_image_entity(&mut self, data: ImageData) -> EntityKey {
        let key = EntityKey(self.next_entity_key);
        self.next_entity_key += 1;
        self.entities.insert(key, Entity::image(data));
        key
    }

    /// Insert an atomic block referencing `key` at the caret
    ///
    /// The block under the caret is split; the atomic block carries the
    /// placeholder text (a single space, so the block stays selectable)
    /// and a single entity range covering it.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::UnknownEntity`] if `key` has not been
    /// registered; a document must never hold a dangling entity
    /// reference.
    pub fn insert_atomic_block(
        &mut self,
        at: Position,
        key: EntityKey,
        placeholder: &str,
    ) -> Result<()> {
        if !self.entities.contains_key(&key) {
            return Err(AvenueError::UnknownEntity(key.0));
        }
        if self.blocks.is_empty() {
            let block_key = self.fresh_block_key();
            self.blocks.push(Block::empty(block_key));
        }
        let index = at.block.min(self.blocks.len() - 1);
        let offset = at.offset.min(self.blocks[index].len_utf16());

        let source = self.blocks[index].clone();
        let split = utf16_to_byte_index(&source.text, offset);
        let (before_styles, after_styles) = split_ranges(&source.inline_style_ranges, offset);
        let (before_entities, after_entities) = split_entity_ranges(&source.entity_ranges, offset);

        let mut before = source.clone();
        before.text = source.text[..split].to_string();
        before.inline_style_ranges = before_styles;
        before.entity_ranges = before_entities;

        let placeholder_len = placeholder.encode_utf16().count();
        let atomic_key = self.fresh_block_key();
        let atomic = Block {
            key: atomic_key,
            text: placeholder.to_string(),
            block_type: BlockType::Atomic,
            depth: 0,
            inline_style_ranges: Vec::new(),
            entity_ranges: vec![EntityRange {
                offset: 0,
                length: placeholder_len,
                key,
            }],
        };

        let after_key = self.fresh_block_key();
        let after = Block {
            key: after_key,
            text: source.text[split..].to_string(),
            block_type: source.block_type,
            depth: source.depth,
            inline_style_ranges: after_styles,
            entity_ranges: after_entities,
        };

        self.blocks.splice(index..=index, [before, atomic, after]);
        Ok(())
    }

    /// Merge a partial update into an entity's data in place
    ///
    /// Block structure is untouched; this is the MUTABLE-entity path
    /// used by interactive image resize.
    ///
    /// # Errors
    ///
    /// Returns [`AvenueError::UnknownEntity`] if `key` does not resolve.
    pub fn update_entity_data(&mut self, key: EntityKey, patch: &ImagePatch) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&key)
            .ok_or(AvenueError::UnknownEntity(key.0))?;
        if let Some(src) = &patch.src {
            entity.data.src = src.clone();
        }
        if let Some(width) = patch.width {
            entity.data.width = Some(width);
        }
        if let Some(height) = patch.height {
            entity.data.height = Some(height);
        }
        if let Some(left) = patch.left {
            entity.data.left = Some(left);
        }
        if let Some(top) = patch.top {
            entity.data.top = Some(top);
        }
        Ok(())
    }
}

/// Byte index corresponding to a UTF-16 offset; clamps past-the-end
fn utf16_to_byte_index(text: &str, utf16_offset: usize) -> usize {
    let mut seen = 0;
    for (byte_index, ch) in text.char_indices() {
        if seen >= utf16_offset {
            return byte_index;
        }
        seen += ch.len_utf16();
    }
    text.len()
}

/// Whether `style` covers every code unit of `[from, to)` in the block
fn style_covers(block: &Block, style: InlineStyle, from: usize, to: usize) -> bool {
    let mut intervals: Vec<(usize, usize)> = block
        .inline_style_ranges
        .iter()
        .filter(|range| range.style == style)
        .map(|range| (range.offset, range.offset + range.length))
        .collect();
    intervals.sort_unstable();

    let mut cursor = from;
    for (a, b) in intervals {
        if b <= cursor {
            continue;
        }
        if a > cursor {
            break;
        }
        cursor = b;
        if cursor >= to {
            return true;
        }
    }
    cursor >= to
}

/// Subtract `[from, to)` from every range of `style`, splitting ranges
/// that straddle the span
fn remove_style(block: &mut Block, style: InlineStyle, from: usize, to: usize) {
    let mut kept = Vec::with_capacity(block.inline_style_ranges.len());
    for range in block.inline_style_ranges.drain(..) {
        if range.style != style {
            kept.push(range);
            continue;
        }
        let (a, b) = (range.offset, range.offset + range.length);
        if b <= from || a >= to {
            kept.push(range);
            continue;
        }
        if a < from {
            kept.push(StyleRange {
                offset: a,
                length: from - a,
                style,
            });
        }
        if b > to {
            kept.push(StyleRange {
                offset: to,
                length: b - to,
                style,
            });
        }
    }
    block.inline_style_ranges = kept;
}

/// Split style ranges around a block split point; ranges straddling the
/// point are divided between the halves, and the tail half is rebased
fn split_ranges(ranges: &[StyleRange], at: usize) -> (Vec<StyleRange>, Vec<StyleRange>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    for range in ranges {
        let (a, b) = (range.offset, range.offset + range.length);
        if b <= at {
            head.push(*range);
        } else if a >= at {
            tail.push(StyleRange {
                offset: a - at,
                length: range.length,
                style: range.style,
            });
        } else {
            head.push(StyleRange {
                offset: a,
                length: at - a,
                style: range.style,
            });
            tail.push(StyleRange {
                offset: 0,
                length: b - at,
                style: range.style,
            });
        }
    }
    (head, tail)
}

/// Entity-range analogue of [`split_ranges`]
fn split_entity_ranges(ranges: &[EntityRange], at: usize) -> (Vec<EntityRange>, Vec<EntityRange>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    for range in ranges {
        let (a, b) = (range.offset, range.offset + range.length);
        if b <= at {
            head.push(*range);
        } else if a >= at {
            tail.push(EntityRange {
                offset: a - at,
                length: range.length,
                key: range.key,
            });
        } else {
            head.push(EntityRange {
                offset: a,
                length: at - a,
                key: range.key,
            });
            tail.push(EntityRange {
                offset: 0,
                length: b - at,
                key: range.key,
            });
        }
    }
    (head, tail)
}
