//! Markdown rendering seam for symbol documentation.

use crate::service::{JsDocTag, SymbolDisplayPart};

/// Converts display parts and JSDoc tags into a markdown string.
pub trait MarkdownRenderer {
    fn render(&self, documentation: &[SymbolDisplayPart], tags: &[JsDocTag]) -> Option<String>;
}

/// Minimal renderer: documentation parts joined verbatim, tags as
/// `*@name* — text` lines. Hosts with a real renderer substitute their own.
#[derive(Debug, Default)]
pub struct PlainMarkdown;

impl MarkdownRenderer for PlainMarkdown {
    fn render(&self, documentation: &[SymbolDisplayPart], tags: &[JsDocTag]) -> Option<String> {
        let mut out = String::new();
        for part in documentation {
            out.push_str(&part.text);
        }
        for tag in tags {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str("*@");
            out.push_str(&tag.name);
            out.push('*');
            if let Some(text) = &tag.text {
                out.push(' ');
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}

#[cfg(test)]
mod docs_tests {
    use super::*;

    #[test]
    fn test_plain_markdown() {
        let renderer = PlainMarkdown;
        assert_eq!(renderer.render(&[], &[]), None);

        let parts = vec![SymbolDisplayPart::text_part("Fires on click.")];
        let tags = vec![JsDocTag {
            name: "deprecated".to_string(),
            text: Some("use press".to_string()),
        }];
        assert_eq!(
            renderer.render(&parts, &tags).as_deref(),
            Some("Fires on click.\n\n*@deprecated* use press")
        );
    }
}
