//! Original-document model for the templating language.
//!
//! A document is markup with optional `<script>`, `<script context="module">`
//! and `<style>` regions. This module provides the lexical queries the
//! completion engine relies on: region lookup, start-tag context, word
//! ranges, and the existing-import scan. It deliberately stops short of a
//! real template parser; everything here is text scanning in the same vein
//! as the suppression heuristics used for plain TypeScript sources.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use svtx_common::{LineMap, Position, Range, TextSpan};

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script([^>]*)>(.*?)</script\s*>").expect("script tag pattern")
});
static STYLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style([^>]*)>(.*?)</style\s*>").expect("style tag pattern"));
static MODULE_CONTEXT_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"context\s*=\s*["']module["']"#).expect("module context pattern")
});
static DEFAULT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"import\s+(?:type\s+)?([A-Za-z_$][\w$]*)").expect("default import pattern")
});
static NAMED_IMPORTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"import\s+(?:type\s+)?\{([^}]*)\}").expect("named import pattern"));

/// A tag-delimited region of the document (script or style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegion {
    /// Full span including the open and close tags.
    pub span: TextSpan,
    /// Span of the content between `>` and `</`.
    pub content: TextSpan,
    /// Raw attribute text of the open tag.
    pub attributes: String,
}

impl TagRegion {
    pub fn contains_offset(&self, offset: u32) -> bool {
        self.content.contains(offset) || offset == self.content.end()
    }
}

/// Where the cursor sits relative to a start tag's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeContext {
    /// In the tag but not inside any attribute value.
    Name,
    /// Inside a quoted attribute value.
    Value { attr_name: String },
}

/// Context for a cursor inside an element/component start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTagInfo {
    /// Tag name as written.
    pub name: String,
    /// Offset of the opening `<`.
    pub start: u32,
    /// Capitalized tags denote component references.
    pub is_component: bool,
    pub attr_context: AttributeContext,
}

/// An original templating-language document.
#[derive(Debug, Clone)]
pub struct Document {
    path: String,
    text: String,
    line_map: LineMap,
}

impl Document {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_map = LineMap::build(&text);
        Document {
            path: path.into(),
            text,
            line_map,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn offset_at(&self, position: Position) -> Option<u32> {
        self.line_map.offset_at(position, &self.text)
    }

    pub fn position_at(&self, offset: u32) -> Position {
        self.line_map.position_at(offset, &self.text)
    }

    pub fn range_of(&self, span: TextSpan) -> Range {
        self.line_map.range_of(span, &self.text)
    }

    /// The instance-level script region, if any.
    pub fn script_region(&self) -> Option<TagRegion> {
        self.script_regions()
            .into_iter()
            .find(|r| !MODULE_CONTEXT_ATTR.is_match(&r.attributes))
    }

    /// The module-level script region (`context="module"`), if any.
    pub fn module_script_region(&self) -> Option<TagRegion> {
        self.script_regions()
            .into_iter()
            .find(|r| MODULE_CONTEXT_ATTR.is_match(&r.attributes))
    }

    fn script_regions(&self) -> Vec<TagRegion> {
        SCRIPT_TAG
            .captures_iter(&self.text)
            .map(|caps| {
                let whole = caps.get(0).expect("whole match");
                let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let content = caps.get(2).expect("content group");
                TagRegion {
                    span: TextSpan::from_bounds(whole.start() as u32, whole.end() as u32),
                    content: TextSpan::from_bounds(content.start() as u32, content.end() as u32),
                    attributes: attrs.to_string(),
                }
            })
            .collect()
    }

    pub fn style_region(&self) -> Option<TagRegion> {
        STYLE_TAG.captures(&self.text).map(|caps| {
            let whole = caps.get(0).expect("whole match");
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let content = caps.get(2).expect("content group");
            TagRegion {
                span: TextSpan::from_bounds(whole.start() as u32, whole.end() as u32),
                content: TextSpan::from_bounds(content.start() as u32, content.end() as u32),
                attributes: attrs.to_string(),
            }
        })
    }

    pub fn is_in_style(&self, position: Position) -> bool {
        let Some(offset) = self.offset_at(position) else {
            return false;
        };
        self.style_region()
            .is_some_and(|region| region.contains_offset(offset))
    }

    pub fn is_in_script(&self, position: Position) -> bool {
        let Some(offset) = self.offset_at(position) else {
            return false;
        };
        self.script_region()
            .is_some_and(|r| r.contains_offset(offset))
            || self
                .module_script_region()
                .is_some_and(|r| r.contains_offset(offset))
    }

    /// The script region that should receive fallback insertions for a
    /// trigger at `position`: the module region when the trigger fell inside
    /// it, otherwise the instance region.
    pub fn script_region_for(&self, position: Position) -> Option<TagRegion> {
        if let Some(module) = self.module_script_region()
            && self
                .offset_at(position)
                .is_some_and(|o| module.contains_offset(o))
        {
            return Some(module);
        }
        self.script_region().or_else(|| self.module_script_region())
    }

    /// Find the start tag whose attribute area contains `offset`, scanning
    /// backward for an unclosed `<name`.
    pub fn tag_at_offset(&self, offset: u32) -> Option<StartTagInfo> {
        let i = (offset as usize).min(self.text.len());
        let before = &self.text[..i];
        let open = before.rfind('<')?;
        let bytes = before.as_bytes();

        // `</` is a close tag, `<` followed by non-letter is not a tag.
        let first = *bytes.get(open + 1)?;
        if !first.is_ascii_alphabetic() {
            return None;
        }
        // A `>` between the `<` and the cursor means the tag is already
        // closed and the cursor is in content.
        if before[open..].contains('>') {
            return None;
        }

        let name_end = before[open + 1..]
            .find(|c: char| !c.is_alphanumeric() && c != '-' && c != '_' && c != '.' && c != ':')
            .map(|p| open + 1 + p)
            .unwrap_or(before.len());
        let name = before[open + 1..name_end].to_string();
        if name.is_empty() {
            return None;
        }

        let attr_text = &before[name_end..];
        let attr_context = attribute_context(attr_text);
        let is_component = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        Some(StartTagInfo {
            name,
            start: open as u32,
            is_component,
            attr_context,
        })
    }

    pub fn tag_at(&self, position: Position) -> Option<StartTagInfo> {
        self.tag_at_offset(self.offset_at(position)?)
    }

    /// True when the cursor sits in markup text content between tags:
    /// outside script/style regions, outside any start tag, after a `>`.
    pub fn is_plain_text_content(&self, position: Position) -> bool {
        let Some(offset) = self.offset_at(position) else {
            return false;
        };
        if self.is_in_script(position) || self.is_in_style(position) {
            return false;
        }
        if self.tag_at_offset(offset).is_some() {
            return false;
        }
        // Inside a moustache expression `{...}` the engine is meaningful.
        let before = &self.text[..offset as usize];
        let open_braces = before.matches('{').count();
        let close_braces = before.matches('}').count();
        if open_braces > close_braces {
            return false;
        }
        match before.rfind(|c| c == '<' || c == '>') {
            Some(p) => self.text.as_bytes()[p] == b'>',
            // Leading text before any tag.
            None => true,
        }
    }

    /// True at the `>|</` boundary between a closing `>` and an immediately
    /// following close tag.
    pub fn is_at_tag_seam(&self, position: Position) -> bool {
        let Some(offset) = self.offset_at(position) else {
            return false;
        };
        let i = offset as usize;
        i > 0 && self.text[..i].ends_with('>') && self.text[i..].starts_with("</")
    }

    /// The token span under the cursor: scan left over non-whitespace,
    /// non-dot characters and right over word, `:` and `$` characters.
    pub fn word_range_at(&self, position: Position) -> TextSpan {
        let Some(offset) = self.offset_at(position) else {
            return TextSpan::new(0, 0);
        };
        let i = offset as usize;
        let start = self.text[..i]
            .rfind(|c: char| c.is_whitespace() || c == '.')
            .map(|p| p + 1)
            .unwrap_or(0);
        let end = self.text[i..]
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':' || c == '$'))
            .map(|p| i + p)
            .unwrap_or(self.text.len());
        TextSpan::from_bounds(start as u32, end as u32)
    }

    /// Names already imported by any script region. Used to suppress
    /// duplicate component suggestions.
    pub fn imported_names(&self) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        for region in self.script_regions() {
            let content = &self.text
                [region.content.start as usize..region.content.end() as usize];
            for caps in DEFAULT_IMPORT.captures_iter(content) {
                let name = &caps[1];
                if name != "type" {
                    names.insert(name.to_string());
                }
            }
            for caps in NAMED_IMPORTS.captures_iter(content) {
                for spec in caps[1].split(',') {
                    // `orig as alias` binds the alias.
                    let bound = spec.split_whitespace().last().unwrap_or("");
                    if !bound.is_empty() {
                        names.insert(bound.to_string());
                    }
                }
            }
        }
        names
    }

    /// True when the cursor is inside the quoted module specifier of an
    /// import statement or dynamic `import(`.
    pub fn is_in_import_path(&self, position: Position) -> bool {
        let Some(offset) = self.offset_at(position) else {
            return false;
        };
        let i = offset as usize;
        let line_start = self.text[..i].rfind('\n').map(|p| p + 1).unwrap_or(0);
        let line_prefix = &self.text[line_start..i];
        let Some(quote_pos) = line_prefix.rfind(['\'', '"']) else {
            return false;
        };
        let quote = line_prefix.as_bytes()[quote_pos] as char;
        // An even count of this quote before the cursor means the last one
        // closed a literal; the cursor is outside.
        if line_prefix.matches(quote).count() % 2 == 0 {
            return false;
        }
        let before_quote = line_prefix[..quote_pos].trim_end();
        before_quote.ends_with("from")
            || before_quote.ends_with("import")
            || before_quote.ends_with("import(")
    }

    /// The two characters around the cursor, for the tag-boundary pattern
    /// check used by the oversized-result heuristic.
    pub fn chars_around(&self, position: Position) -> (Option<char>, Option<char>) {
        let Some(offset) = self.offset_at(position) else {
            return (None, None);
        };
        let i = offset as usize;
        let prev = self.text[..i].chars().next_back();
        let next = self.text[i..].chars().next();
        (prev, next)
    }

    /// Structural parse error heuristic: a `<` that never closes. Used to
    /// downgrade empty results into an explicit incomplete list so the
    /// editor keeps the completion session open.
    pub fn has_unclosed_tag(&self) -> bool {
        match self.text.rfind('<') {
            Some(p) => {
                let rest = &self.text[p..];
                rest.len() > 1
                    && rest.as_bytes()[1].is_ascii_alphabetic()
                    && !rest.contains('>')
            }
            None => false,
        }
    }
}

/// Classify the cursor position within a start tag's attribute text.
fn attribute_context(attr_text: &str) -> AttributeContext {
    let mut in_quote: Option<char> = None;
    let mut attr_of_value = String::new();

    for (idx, ch) in attr_text.char_indices() {
        match in_quote {
            Some(q) => {
                if ch == q {
                    in_quote = None;
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    // The attribute name is the word before the `=`.
                    let before = attr_text[..idx].trim_end().trim_end_matches('=');
                    attr_of_value = before
                        .rsplit(|c: char| c.is_whitespace())
                        .next()
                        .unwrap_or("")
                        .to_string();
                    in_quote = Some(ch);
                }
            }
        }
    }

    match in_quote {
        Some(_) => AttributeContext::Value {
            attr_name: attr_of_value,
        },
        None => AttributeContext::Name,
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod document_tests;
