//! Half-open byte spans, the engine-native replacement-span shape.

/// A half-open `[start, start + length)` byte span in one document.
/// Spans never mix coordinate spaces: a span is either in the original
/// document or in the generated document, determined by where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub fn new(start: u32, length: u32) -> Self {
        TextSpan { start, length }
    }

    /// Build a span from start and (exclusive) end offsets.
    pub fn from_bounds(start: u32, end: u32) -> Self {
        TextSpan {
            start,
            length: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }
}

#[cfg(test)]
mod span_tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let span = TextSpan::from_bounds(3, 8);
        assert_eq!(span.start, 3);
        assert_eq!(span.length, 5);
        assert_eq!(span.end(), 8);
        assert!(span.contains(3));
        assert!(span.contains(7));
        assert!(!span.contains(8));
    }

    #[test]
    fn test_empty() {
        let span = TextSpan::new(4, 0);
        assert!(span.is_empty());
        assert!(!span.contains(4));
    }
}
