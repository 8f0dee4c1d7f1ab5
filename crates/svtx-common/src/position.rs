//! Position and location utilities.
//!
//! Editors speak in line/column positions while the translation engine works
//! on byte offsets; this module provides the conversion layer. Columns are
//! counted in UTF-16 code units for LSP compatibility.

use crate::span::TextSpan;

/// A position in a source document (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units)
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }

    /// Absolute distance to another position on the character axis.
    /// Positions on different lines have no character distance; callers
    /// check the line first.
    pub fn character_delta(&self, other: Position) -> u32 {
        self.character.abs_diff(other.character)
    }
}

/// A range in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// An empty range collapsed onto a single position.
    pub fn collapsed(position: Position) -> Self {
        Range {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && position <= self.end
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];

        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push((i + 1) as u32);
            } else if ch == '\r' {
                // \r\n produces one line start via the \n branch; a bare \r
                // is a line ending on its own.
                if source.as_bytes().get(i + 1) != Some(&b'\n') {
                    line_starts.push((i + 1) as u32);
                }
            }
        }

        LineMap { line_starts }
    }

    /// Convert a byte offset to a position. Character is counted in UTF-16
    /// code units.
    pub fn position_at(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let clamped_end = (offset as usize).min(source.len());
        let start = (line_start as usize).min(clamped_end);
        let slice = source.get(start..clamped_end).unwrap_or("");
        let character = slice.chars().map(|ch| ch.len_utf16() as u32).sum();

        Position {
            line: line as u32,
            character,
        }
    }

    /// Convert a position to a byte offset. Returns `None` when the line
    /// does not exist; a column past the end of the line clamps to the line
    /// ending.
    pub fn offset_at(&self, position: Position, source: &str) -> Option<u32> {
        let line_idx = position.line as usize;
        let line_start = *self.line_starts.get(line_idx)?;
        let line_limit = if line_idx + 1 < self.line_starts.len() {
            self.line_starts[line_idx + 1]
        } else {
            source.len() as u32
        };
        let slice = source
            .get(line_start as usize..line_limit as usize)
            .unwrap_or("");
        let mut utf16_count = 0u32;
        let mut byte_count = 0u32;

        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            let ch_utf16 = ch.len_utf16() as u32;
            if utf16_count + ch_utf16 > position.character {
                break;
            }
            utf16_count += ch_utf16;
            byte_count += ch.len_utf8() as u32;
            if utf16_count == position.character {
                break;
            }
        }

        Some(line_start + byte_count)
    }

    /// Convert a byte span to a range.
    pub fn range_of(&self, span: TextSpan, source: &str) -> Range {
        Range::new(
            self.position_at(span.start, source),
            self.position_at(span.end(), source),
        )
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_line_map_simple() {
        let source = "line1\nline2\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_at(0, source), Position::new(0, 0));
        assert_eq!(map.position_at(4, source), Position::new(0, 4));
        assert_eq!(map.position_at(6, source), Position::new(1, 0));
        assert_eq!(map.position_at(12, source), Position::new(2, 0));
    }

    #[test]
    fn test_line_map_windows_line_endings() {
        let source = "line1\r\nline2\r\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_at(7, source), Position::new(1, 0));
    }

    #[test]
    fn test_offset_at_roundtrip() {
        let source = "let a = 1;\n<Widget prop={a} />\n";
        let map = LineMap::build(source);

        for offset in 0..source.len() as u32 {
            let pos = map.position_at(offset, source);
            let back = map.offset_at(pos, source).unwrap();
            assert_eq!(offset, back, "roundtrip failed for offset {}", offset);
        }
    }

    #[test]
    fn test_utf16_columns() {
        let source = "A 🚀 B";
        let map = LineMap::build(source);

        assert_eq!(map.position_at(2, source).character, 2);
        assert_eq!(map.position_at(7, source).character, 5);
        assert_eq!(map.offset_at(Position::new(0, 5), source), Some(7));
    }

    #[test]
    fn test_range_of_span() {
        let source = "ab\ncdef";
        let map = LineMap::build(source);
        let range = map.range_of(TextSpan::new(1, 4), source);
        assert_eq!(range.start, Position::new(0, 1));
        assert_eq!(range.end, Position::new(1, 2));
    }

    #[test]
    fn test_character_delta() {
        assert_eq!(Position::new(3, 7).character_delta(Position::new(3, 5)), 2);
        assert_eq!(Position::new(3, 5).character_delta(Position::new(3, 7)), 2);
    }
}
