//! Seam to the type-checking language service.
//!
//! The engine consumes the service through a closed set of shapes: exactly
//! the fields this crate reads, not the service's full native protocol.
//! Field names align with the tsserver protocol (`name`, `kindModifiers`,
//! `replacementSpan`, `source`, ...).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use svtx_common::TextSpan;

/// The kind of a raw completion entry, matching tsserver's
/// ScriptElementKind values the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScriptElementKind {
    Variable,
    Function,
    Class,
    Method,
    Parameter,
    Property,
    /// A member variable (object/class field). The oversized-result
    /// heuristic keys off this kind.
    MemberVariable,
    Keyword,
    Interface,
    Enum,
    TypeAlias,
    Module,
    /// A script file entry (import-path completion).
    ScriptElement,
    String,
    Directory,
}

/// A raw completion candidate as returned by the language service, in
/// generated-document coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompletionEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    pub kind: ScriptElementKind,
    /// Comma-separated modifier flags such as `export`, `declare`, or a
    /// file extension for script entries (tsserver: `kindModifiers`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind_modifiers: Option<String>,
    /// Module specifier for auto-import completions (tsserver: `source`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Generated-document span the insert text should replace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement_span: Option<TextSpan>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_recommended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
}

impl RawCompletionEntry {
    pub fn new(name: impl Into<String>, kind: ScriptElementKind) -> Self {
        RawCompletionEntry {
            name: name.into(),
            insert_text: None,
            kind,
            kind_modifiers: None,
            source: None,
            replacement_span: None,
            is_recommended: false,
            sort_text: None,
        }
    }
}

/// Raw completion batch from the service.
#[derive(Debug, Clone, Default)]
pub struct RawCompletionInfo {
    pub entries: Vec<RawCompletionEntry>,
}

/// A fragment of a rendered symbol description (tsserver display part).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymbolDisplayPart {
    pub text: String,
    pub kind: String,
}

impl SymbolDisplayPart {
    pub fn text_part(text: impl Into<String>) -> Self {
        SymbolDisplayPart {
            text: text.into(),
            kind: "text".to_string(),
        }
    }
}

/// A JSDoc tag attached to a symbol (e.g. `@param`, `@deprecated`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JsDocTag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One replacement inside a code-fix, in generated-document coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub span: TextSpan,
    pub new_text: String,
}

/// File-scoped changes of one code-fix action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTextChanges {
    pub file_name: String,
    pub text_changes: Vec<TextChange>,
}

/// A code-fix action accompanying a resolved completion (auto-import).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodeFixAction {
    pub description: String,
    pub changes: Vec<FileTextChanges>,
}

/// Extended detail for one completion entry, fetched on resolve.
#[derive(Debug, Clone, Default)]
pub struct CompletionEntryDetail {
    pub display_parts: Vec<SymbolDisplayPart>,
    pub documentation: Vec<SymbolDisplayPart>,
    pub tags: Vec<JsDocTag>,
    pub code_actions: Vec<CodeFixAction>,
}

/// How auto-import module specifiers should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportModuleSpecifierEnding {
    #[default]
    Auto,
    Minimal,
    Index,
    Js,
}

/// The preference subset the engine forwards to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    pub import_module_specifier_ending: ImportModuleSpecifierEnding,
    pub include_completions_for_module_exports: bool,
}

/// The language service surface the engine consumes. Offsets are
/// generated-document byte offsets.
pub trait LanguageService {
    /// Query completions at a generated offset. `None` when the service has
    /// nothing to offer there.
    fn completions_at(
        &self,
        offset: u32,
        trigger_character: Option<char>,
        preferences: &UserPreferences,
    ) -> Option<RawCompletionInfo>;

    /// Fetch extended detail for one entry, identified the way the service
    /// identifies it: offset, entry name and optional source module.
    fn completion_detail(
        &self,
        offset: u32,
        name: &str,
        source: Option<&str>,
        preferences: &UserPreferences,
    ) -> Option<CompletionEntryDetail>;
}

/// Cooperative cancellation flag shared between the request dispatcher and
/// the engine. Checked, never caught: a cancelled request returns early
/// with no result and no side effects.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
