//! Completion translation between original documents and the generated TSX.
//!
//! Control flow per request: trigger gate, single-slot cache lookup,
//! original-to-generated position mapping, language-service query, raw
//! filtering, per-item translation and text-edit fixing, merge with
//! metadata (event/slot) completions, cache store. Resolution of a selected
//! item runs later and independently (see `completions::resolve`).

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use svtx_common::{Position, Range, TextSpan};

use crate::config::CompletionConfig;
use crate::docs::MarkdownRenderer;
use crate::document::{AttributeContext, Document, StartTagInfo};
use crate::metadata::{ComponentPartInfo, ComponentRegistry};
use crate::service::{
    CancellationToken, LanguageService, RawCompletionEntry, ScriptElementKind, UserPreferences,
};
use crate::snapshot::TsxSnapshot;

mod filters;
mod resolve;

/// Trigger characters the language service understands for this language.
const ALLOWED_TRIGGER_CHARACTERS: &[char] = &['.', '"', '\'', '`', '/', '@', '<', '#'];
/// Doc-comment template trigger, forwarded to the service as-is.
const DOC_TEMPLATE_TRIGGER: char = '*';
/// Event/slot binding trigger. Never valid for the service; metadata
/// completions are returned alone.
const EVENT_OR_SLOT_TRIGGER: char = ':';

/// Suffix the compiler appends to component placeholder names in the
/// generated document.
const COMPONENT_SUFFIX: &str = "__SvelteComponent_";
/// Prefix of compiler-injected helper symbols that must never surface.
const RESERVED_INTERNAL_PREFIX: &str = "__sveltets_";
/// Shim type names that only exist to make the generated document
/// type-check.
const SHIM_TYPE_NAMES: &[&str] = &[
    "svelteHTML",
    "SvelteComponent",
    "SvelteComponentDev",
    "SvelteComponentTyped",
];

/// Above this raw entry count inside a start tag, the batch is treated as a
/// false global-scope leak. Empirical threshold of the wrapped service;
/// revisit if its behavior changes.
const MAX_RAW_ENTRIES: usize = 500;
/// Cache reuse window on the character axis (re-trigger / import path).
/// Empirical, not derived from the grammar.
const CACHE_REUSE_MAX_DELTA: u32 = 2;
/// Wider reuse window for `:` triggers inside a start tag. Empirical.
const CACHE_REUSE_TAG_MAX_DELTA: u32 = 4;

/// Sort text sentinels. Lower strings sort first; the service's own sort
/// texts start at "10".
pub mod sort_priority {
    /// Component references jump ahead of everything the service returns.
    pub const COMPONENT: &str = "-1";
    /// Event/slot metadata completions share the component priority.
    pub const METADATA: &str = "-1";
}

/// Why a completion request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletionTriggerKind {
    Invoked,
    TriggerCharacter,
    TriggerForIncompleteCompletions,
}

/// Trigger kind plus the typed character, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionTrigger {
    pub kind: CompletionTriggerKind,
    pub character: Option<char>,
}

impl CompletionTrigger {
    pub fn invoked() -> Self {
        CompletionTrigger {
            kind: CompletionTriggerKind::Invoked,
            character: None,
        }
    }

    pub fn character(c: char) -> Self {
        CompletionTrigger {
            kind: CompletionTriggerKind::TriggerCharacter,
            character: Some(c),
        }
    }

    pub fn incomplete() -> Self {
        CompletionTrigger {
            kind: CompletionTriggerKind::TriggerForIncompleteCompletions,
            character: None,
        }
    }
}

/// The editor-facing kind of a completion item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletionItemKind {
    Text,
    Method,
    Function,
    Field,
    Variable,
    Class,
    Interface,
    Module,
    Property,
    Keyword,
    File,
    Folder,
    Event,
    Constant,
    TypeParameter,
}

/// A text replacement in original-document coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        TextEdit {
            range,
            new_text: new_text.into(),
        }
    }

    /// An insertion collapsed onto one position.
    pub fn insert(position: Position, new_text: impl Into<String>) -> Self {
        TextEdit::new(Range::collapsed(position), new_text)
    }
}

/// Opaque payload carried by every service-derived item until resolve time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResolveData {
    pub entry: RawCompletionEntry,
    pub file_path: String,
    /// The original-document position the completion was triggered at.
    pub position: Position,
}

/// A completion item in the editor's shape, original-document coordinates
/// throughout.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    pub kind: CompletionItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_characters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub preselect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_edit: Option<TextEdit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_text_edits: Option<Vec<TextEdit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CompletionResolveData>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        CompletionItem {
            label: label.into(),
            insert_text: None,
            kind,
            commit_characters: None,
            sort_text: None,
            preselect: false,
            text_edit: None,
            additional_text_edits: None,
            detail: None,
            documentation: None,
            data: None,
        }
    }

    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_text_edit(mut self, edit: TextEdit) -> Self {
        self.text_edit = Some(edit);
        self
    }

    fn push_additional_edit(&mut self, edit: TextEdit) {
        self.additional_text_edits.get_or_insert_default().push(edit);
    }
}

/// The completion list handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    pub is_incomplete: bool,
    pub items: Vec<CompletionItem>,
}

/// Single-slot memo of the last computed result. Valid only for the same
/// document; discarded on any non-reusable trigger.
#[derive(Debug, Clone)]
pub struct LastCompletion {
    pub path: String,
    pub position: Position,
    pub list: CompletionList,
}

/// Map a service entry kind to the editor item kind. Fixed table.
pub fn item_kind_for(kind: ScriptElementKind) -> CompletionItemKind {
    match kind {
        ScriptElementKind::Variable => CompletionItemKind::Variable,
        ScriptElementKind::Function => CompletionItemKind::Function,
        ScriptElementKind::Class => CompletionItemKind::Class,
        ScriptElementKind::Method => CompletionItemKind::Method,
        ScriptElementKind::Parameter => CompletionItemKind::Variable,
        ScriptElementKind::Property => CompletionItemKind::Property,
        ScriptElementKind::MemberVariable => CompletionItemKind::Field,
        ScriptElementKind::Keyword => CompletionItemKind::Keyword,
        ScriptElementKind::Interface => CompletionItemKind::Interface,
        ScriptElementKind::Enum => CompletionItemKind::Constant,
        ScriptElementKind::TypeAlias => CompletionItemKind::TypeParameter,
        ScriptElementKind::Module => CompletionItemKind::Module,
        ScriptElementKind::ScriptElement => CompletionItemKind::File,
        ScriptElementKind::String => CompletionItemKind::Text,
        ScriptElementKind::Directory => CompletionItemKind::Folder,
    }
}

/// Commit characters per entry kind. Fixed table; `None` disables commit
/// characters for the item.
pub fn commit_characters_for(kind: ScriptElementKind) -> Option<&'static [&'static str]> {
    match kind {
        ScriptElementKind::Function | ScriptElementKind::Method => Some(&[".", ",", "("]),
        ScriptElementKind::Variable
        | ScriptElementKind::Parameter
        | ScriptElementKind::Property
        | ScriptElementKind::MemberVariable
        | ScriptElementKind::Enum => Some(&[".", ",", ";"]),
        ScriptElementKind::Class | ScriptElementKind::Interface | ScriptElementKind::Module => {
            Some(&["."])
        }
        ScriptElementKind::Keyword
        | ScriptElementKind::TypeAlias
        | ScriptElementKind::ScriptElement
        | ScriptElementKind::String
        | ScriptElementKind::Directory => None,
    }
}

/// Completions provider.
///
/// Borrows the per-document collaborators; the single-slot cache is owned
/// by the caller and threaded through as `&mut Option<LastCompletion>` so
/// it can outlive individual requests.
pub struct Completions<'a> {
    document: &'a Document,
    snapshot: &'a TsxSnapshot,
    service: &'a dyn LanguageService,
    components: &'a dyn ComponentRegistry,
    markdown: &'a dyn MarkdownRenderer,
    config: &'a CompletionConfig,
    preferences: UserPreferences,
}

impl<'a> Completions<'a> {
    pub fn new(
        document: &'a Document,
        snapshot: &'a TsxSnapshot,
        service: &'a dyn LanguageService,
        components: &'a dyn ComponentRegistry,
        markdown: &'a dyn MarkdownRenderer,
        config: &'a CompletionConfig,
    ) -> Self {
        Completions {
            document,
            snapshot,
            service,
            components,
            markdown,
            config,
            preferences: UserPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Get completions at the given original-document position.
    ///
    /// Returns `None` when the position or trigger is not eligible; "no
    /// completions applicable" is never an error.
    pub fn get_completions(
        &self,
        position: Position,
        trigger: CompletionTrigger,
        last: &mut Option<LastCompletion>,
        cancel: Option<&CancellationToken>,
    ) -> Option<CompletionList> {
        if !self.is_eligible_trigger(position, trigger) {
            *last = None;
            return None;
        }

        if let Some(cached) = last.as_mut()
            && self.can_reuse(cached, trigger, position)
        {
            debug!(line = position.line, "completion cache hit");
            cached.position = position;
            return Some(cached.list.clone());
        }
        // Never serve a result computed against a stale word range.
        *last = None;

        let generated_offset = self.snapshot.generated_offset(position)?;
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }

        let tag = self.document.tag_at(position);
        let metadata_items = self.metadata_completions(position, tag.as_ref());

        // `:` is exclusively an event/slot trigger; the service never sees it.
        if trigger.character == Some(EVENT_OR_SLOT_TRIGGER) {
            let list = CompletionList {
                is_incomplete: false,
                items: metadata_items,
            };
            self.store(last, position, &list);
            return Some(list);
        }

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }

        let service_trigger = trigger.character.filter(|&c| {
            ALLOWED_TRIGGER_CHARACTERS.contains(&c) || c == DOC_TEMPLATE_TRIGGER
        });
        let raw = self
            .service
            .completions_at(generated_offset, service_trigger, &self.preferences)
            .map(|info| info.entries)
            .unwrap_or_default();

        let raw = if raw.is_empty() {
            self.string_literal_prop_entries(position, tag.as_ref())
                .unwrap_or_default()
        } else {
            raw
        };

        let word_range = self.document.word_range_at(position);
        let filtered = self.filter_raw_entries(raw, position, tag.as_ref(), &metadata_items);

        let existing_imports = self.document.imported_names();
        let anchor = self.document.position_at(word_range.start);
        let mut items: Vec<CompletionItem> = metadata_items;
        for entry in &filtered {
            if let Some(mut item) = self.translate_entry(entry, position, &existing_imports) {
                self.fix_text_edit_range(anchor, &mut item);
                items.push(item);
            }
        }

        let has_parse_error =
            self.snapshot.has_parse_error() || self.document.has_unclosed_tag();
        if items.is_empty() && !has_parse_error {
            return None;
        }
        let list = CompletionList {
            // Keep the editor's completion session open while the document
            // does not parse; results will improve as the user types.
            is_incomplete: has_parse_error,
            items,
        };
        self.store(last, position, &list);
        Some(list)
    }

    fn store(&self, last: &mut Option<LastCompletion>, position: Position, list: &CompletionList) {
        *last = Some(LastCompletion {
            path: self.document.path().to_string(),
            position,
            list: list.clone(),
        });
    }

    /// Reuse predicate for the single-slot cache. The deltas trade a small
    /// staleness risk for skipping a full service query per keystroke while
    /// typing in an import path or an event/slot binding.
    fn can_reuse(
        &self,
        last: &LastCompletion,
        trigger: CompletionTrigger,
        position: Position,
    ) -> bool {
        if last.path != self.document.path() || last.position.line != position.line {
            return false;
        }
        let delta = position.character_delta(last.position);
        let narrow = delta < CACHE_REUSE_MAX_DELTA
            && (trigger.kind == CompletionTriggerKind::TriggerForIncompleteCompletions
                || (trigger.character == Some('.') && self.document.is_in_import_path(position)));
        let tag_window = delta < CACHE_REUSE_TAG_MAX_DELTA
            && trigger.character == Some(EVENT_OR_SLOT_TRIGGER)
            && self.document.tag_at(position).is_some();
        narrow || tag_window
    }

    /// Event/slot completions from component metadata. Empty when the
    /// cursor is not over a component reference or sits inside an attribute
    /// value.
    fn metadata_completions(
        &self,
        position: Position,
        tag: Option<&StartTagInfo>,
    ) -> Vec<CompletionItem> {
        let Some(tag) = tag else {
            return Vec::new();
        };
        if matches!(tag.attr_context, AttributeContext::Value { .. }) {
            return Vec::new();
        }
        let Some(component) = self.components.component_at(self.document, position) else {
            return Vec::new();
        };

        let word_range = self.document.word_range_at(position);
        let mut items = Vec::new();
        for (prefix, parts) in [
            ("on:", component.events()),
            ("let:", component.slot_lets()),
        ] {
            for part in parts {
                items.push(self.metadata_item(prefix, &part, word_range));
            }
        }
        items
    }

    fn metadata_item(
        &self,
        prefix: &str,
        part: &ComponentPartInfo,
        word_range: TextSpan,
    ) -> CompletionItem {
        let label = format!("{}{}", prefix, part.name);
        let mut item = CompletionItem::new(&label, CompletionItemKind::Event)
            .with_sort_text(sort_priority::METADATA)
            .with_detail(format!("{}: {}", part.name, part.part_type));
        item.documentation = part.documentation.clone();
        if !word_range.is_empty() {
            item.text_edit = Some(TextEdit::new(self.document.range_of(word_range), label));
        }
        item
    }

    /// Convert one raw service entry to the editor shape. Returns `None`
    /// for entries suppressed by label computation (existing-import
    /// duplicates) — a filtered outcome, not an error.
    fn translate_entry(
        &self,
        entry: &RawCompletionEntry,
        position: Position,
        existing_imports: &FxHashSet<String>,
    ) -> Option<CompletionItem> {
        let is_component = entry.name.ends_with(COMPONENT_SUFFIX);
        let mut label = if is_component {
            let user_name = entry.name.trim_end_matches(COMPONENT_SUFFIX);
            // The compiler's naming convention would otherwise produce a
            // second suggestion for an already-imported component.
            if existing_imports.contains(user_name) {
                trace!(name = %user_name, "suppressing already-imported component");
                return None;
            }
            user_name.to_string()
        } else {
            entry.name.clone()
        };

        let insert_text = entry
            .insert_text
            .as_ref()
            .map(|text| text.replace(COMPONENT_SUFFIX, ""));

        // Script entries carry the file extension as a kind modifier;
        // appending it disambiguates overloaded module names.
        if entry.kind == ScriptElementKind::ScriptElement
            && let Some(modifiers) = &entry.kind_modifiers
            && !modifiers.is_empty()
            && !label.ends_with(modifiers.as_str())
        {
            label.push_str(modifiers);
        }

        let mut item = CompletionItem::new(&label, item_kind_for(entry.kind));
        item.insert_text = insert_text;
        item.commit_characters = commit_characters_for(entry.kind)
            .map(|chars| chars.iter().map(|c| c.to_string()).collect());

        if let Some(span) = entry.replacement_span
            && let Some(range) = self.snapshot.original_range(span)
        {
            let new_text = item.insert_text.clone().unwrap_or_else(|| label.clone());
            item.text_edit = Some(TextEdit::new(range, new_text));
        }

        if is_component {
            item.sort_text = Some(sort_priority::COMPONENT.to_string());
            item.preselect = true;
        } else {
            item.sort_text = entry.sort_text.clone();
            item.preselect = entry.is_recommended;
        }

        item.data = Some(CompletionResolveData {
            entry: entry.clone(),
            file_path: self.document.path().to_string(),
            position,
        });
        Some(item)
    }

    /// Editors reject items whose text edit does not overlap the word range
    /// anchoring the popup. When the primary edit starts left of the anchor
    /// column on the same line, split off the prefix into an additional
    /// edit so the primary edit starts exactly at the anchor.
    fn fix_text_edit_range(&self, anchor: Position, item: &mut CompletionItem) {
        let Some(edit) = item.text_edit.as_mut() else {
            return;
        };
        let start = edit.range.start;
        if start.line != anchor.line || start.character >= anchor.character {
            return;
        }

        // Columns are UTF-16 code units; split the replacement text on the
        // same axis.
        let prefix_units = anchor.character - start.character;
        let mut units = 0u32;
        let mut split_at = edit.new_text.len();
        for (i, ch) in edit.new_text.char_indices() {
            if units >= prefix_units {
                split_at = i;
                break;
            }
            units += ch.len_utf16() as u32;
        }
        let prefix = edit.new_text[..split_at].to_string();
        edit.new_text = edit.new_text[split_at..].to_string();
        edit.range.start = anchor;

        item.push_additional_edit(TextEdit::new(Range::new(start, anchor), prefix));
    }

    /// Declared-prop entries used when an oversized raw batch is narrowed.
    fn prop_entries_for(&self, parts: &[ComponentPartInfo]) -> Vec<RawCompletionEntry> {
        parts
            .iter()
            .map(|part| {
                let mut entry =
                    RawCompletionEntry::new(&part.name, ScriptElementKind::MemberVariable);
                entry.sort_text = Some(sort_priority::COMPONENT.to_string());
                entry
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/completions_tests.rs"]
mod completions_tests;
