//! Generated-document snapshot and the position-mapper seam.
//!
//! The compiler (out of scope here) produces a TSX rendition of each
//! document together with a bidirectional position mapper. This module wraps
//! both behind the small adapter surface the completion engine consumes:
//! offset arithmetic on the generated text and original<->generated
//! coordinate conversion. Positions that have no counterpart map to `None`;
//! there is no sentinel line.

use svtx_common::{LineMap, Position, Range, TextSpan};

/// Bidirectional original<->generated position mapping.
///
/// Implementations are built alongside the generated document; the engine
/// never constructs one from scratch.
pub trait SourceMapper {
    /// Map an original-document position into the generated document.
    /// `None` when the position has no generated counterpart (e.g. markup
    /// the compiler dropped).
    fn to_generated(&self, position: Position) -> Option<Position>;

    /// Map a generated-document position back into the original document.
    fn to_original(&self, position: Position) -> Option<Position>;
}

/// Mapper for documents whose generated text equals the original text
/// (plain script content passed through unchanged).
#[derive(Debug, Default)]
pub struct IdentityMapper;

impl SourceMapper for IdentityMapper {
    fn to_generated(&self, position: Position) -> Option<Position> {
        Some(position)
    }

    fn to_original(&self, position: Position) -> Option<Position> {
        Some(position)
    }
}

/// A single original<->generated line correspondence with a column shift.
/// Positions on unlisted lines are unmapped.
#[derive(Debug, Clone, Copy)]
pub struct LineSegment {
    pub original_line: u32,
    pub generated_line: u32,
    /// Added to the original column to obtain the generated column.
    pub column_shift: i32,
}

/// Table-driven mapper assembled from per-line segments. Mirrors the shape
/// of the compiler's sourcemap after it has been collapsed to line
/// granularity; sufficient for hosts and for exercising the engine.
#[derive(Debug, Default)]
pub struct SegmentMapper {
    segments: Vec<LineSegment>,
}

impl SegmentMapper {
    pub fn new(segments: Vec<LineSegment>) -> Self {
        SegmentMapper { segments }
    }
}

impl SourceMapper for SegmentMapper {
    fn to_generated(&self, position: Position) -> Option<Position> {
        let seg = self
            .segments
            .iter()
            .find(|s| s.original_line == position.line)?;
        let character = position.character.checked_add_signed(seg.column_shift)?;
        Some(Position::new(seg.generated_line, character))
    }

    fn to_original(&self, position: Position) -> Option<Position> {
        let seg = self
            .segments
            .iter()
            .find(|s| s.generated_line == position.line)?;
        let character = position.character.checked_add_signed(-seg.column_shift)?;
        Some(Position::new(seg.original_line, character))
    }
}

/// Snapshot of the generated TSX document for one original document.
pub struct TsxSnapshot {
    text: String,
    line_map: LineMap,
    mapper: Box<dyn SourceMapper + Send + Sync>,
    parse_error: bool,
}

impl TsxSnapshot {
    pub fn new(
        text: impl Into<String>,
        mapper: Box<dyn SourceMapper + Send + Sync>,
    ) -> Self {
        let text = text.into();
        let line_map = LineMap::build(&text);
        TsxSnapshot {
            text,
            line_map,
            mapper,
            parse_error: false,
        }
    }

    /// Mark the snapshot as produced from a document with a structural
    /// parse error. Results computed against it degrade instead of failing.
    pub fn with_parse_error(mut self, parse_error: bool) -> Self {
        self.parse_error = parse_error;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_parse_error(&self) -> bool {
        self.parse_error
    }

    pub fn offset_at(&self, position: Position) -> Option<u32> {
        self.line_map.offset_at(position, &self.text)
    }

    pub fn position_at(&self, offset: u32) -> Position {
        self.line_map.position_at(offset, &self.text)
    }

    /// Map an original position to a generated byte offset.
    pub fn generated_offset(&self, original: Position) -> Option<u32> {
        let generated = self.mapper.to_generated(original)?;
        self.offset_at(generated)
    }

    /// Map a generated position back to the original document.
    pub fn original_position(&self, generated: Position) -> Option<Position> {
        self.mapper.to_original(generated)
    }

    /// Map a generated position back to the original document, first
    /// shifting its line by `line_shift`. Compensates for synthetic
    /// generated lines with no original counterpart.
    pub fn original_position_shifted(
        &self,
        generated: Position,
        line_shift: i32,
    ) -> Option<Position> {
        let line = generated.line.checked_add_signed(line_shift)?;
        let mapped = self
            .mapper
            .to_original(Position::new(line, generated.character))?;
        let restored = mapped.line.checked_add_signed(-line_shift)?;
        Some(Position::new(restored, mapped.character))
    }

    /// Translate a generated-document span into an original-document range.
    pub fn original_range(&self, span: TextSpan) -> Option<Range> {
        let start = self.original_position(self.position_at(span.start))?;
        let end = self.original_position(self.position_at(span.end()))?;
        Some(Range::new(start, end))
    }

    /// Whether an original position falls inside the compiler-generated
    /// region at all.
    pub fn is_in_generated_region(&self, original: Position) -> bool {
        self.mapper.to_generated(original).is_some()
    }
}

impl std::fmt::Debug for TsxSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsxSnapshot")
            .field("text_len", &self.text.len())
            .field("parse_error", &self.parse_error)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod snapshot_tests;
