//! On-demand resolution of a previously returned completion item: extended
//! detail, documentation, and translation of auto-import code actions into
//! original-document edits.

use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::TagRegion;
use crate::service::{ImportModuleSpecifierEnding, TextChange};

/// File extension of templating-language modules.
const TEMPLATE_FILE_EXTENSION: &str = ".svelte";

/// Leading type-only modifier of an import statement.
static TYPE_ONLY_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\s*)import\s+type\s+").expect("type-only import pattern"));

impl<'a> Completions<'a> {
    /// Populate detail, documentation and auto-import edits for a selected
    /// item. Items without a resolution payload (metadata completions) are
    /// left untouched; any absent piece of detail contributes nothing.
    pub fn resolve_completion(&self, item: &mut CompletionItem) {
        let Some(data) = item.data.clone() else {
            return;
        };
        let Some(generated_offset) = self.snapshot.generated_offset(data.position) else {
            return;
        };

        // The service's module-specifier-ending handling asserts on the
        // templating extension; substitute the equivalent index form for
        // the duration of this single call.
        let mut preferences = self.preferences.clone();
        if data
            .entry
            .source
            .as_deref()
            .is_some_and(|s| s.ends_with(TEMPLATE_FILE_EXTENSION))
        {
            preferences.import_module_specifier_ending = ImportModuleSpecifierEnding::Index;
        }

        let Some(detail) = self.service.completion_detail(
            generated_offset,
            &data.entry.name,
            data.entry.source.as_deref(),
            &preferences,
        ) else {
            return;
        };

        let display: String = detail
            .display_parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        if !display.is_empty() {
            item.detail = Some(display.replace(COMPONENT_SUFFIX, ""));
        }
        if let Some(docs) = self.markdown.render(&detail.documentation, &detail.tags) {
            item.documentation = Some(docs);
        }

        let from_markup = !self.document.is_in_script(data.position);
        for action in &detail.code_actions {
            for file_change in &action.changes {
                for change in &file_change.text_changes {
                    if let Some(edit) =
                        self.translate_import_change(change, data.position, from_markup)
                    {
                        item.push_additional_edit(edit);
                    }
                }
            }
        }
    }

    /// Translate one code-action change from generated-document coordinates
    /// into an original-document edit.
    ///
    /// Fallback chain, first matching rule wins:
    /// 1. no script region yet — wrap the text in a new region at the very
    ///    start of the document;
    /// 2. brand-new import (column-0, multi-line span) — remap through a
    ///    line window shifted by -1/+1 to skip the generated document's
    ///    synthetic leading import line;
    /// 3. mappable span — use the mapped range;
    /// 4. otherwise — insert at the script region's own start.
    pub(super) fn translate_import_change(
        &self,
        change: &TextChange,
        trigger: Position,
        from_markup: bool,
    ) -> Option<TextEdit> {
        let is_component_import = change.new_text.contains(COMPONENT_SUFFIX);
        let mut new_text = change.new_text.replace(COMPONENT_SUFFIX, "");
        // The service injects a type-only modifier for component imports
        // and for actions triggered from markup; neither import is
        // type-only in the original document.
        if is_component_import || from_markup {
            new_text = TYPE_ONLY_IMPORT.replace_all(&new_text, "${1}import ").into_owned();
        }

        let Some(region) = self.document.script_region_for(trigger) else {
            debug!("auto-import into document without script region");
            if !new_text.ends_with('\n') {
                new_text.push('\n');
            }
            let wrapped = format!(
                "{}\n{}</script>\n",
                self.config.script_open_tag(),
                new_text
            );
            return Some(TextEdit::insert(Position::new(0, 0), wrapped));
        };

        // Replacement of an existing statement (non-empty span): usable
        // only when both ends map back inside the script region.
        if !change.span.is_empty()
            && let Some(range) = self.snapshot.original_range(change.span)
            && self.range_in_region(range, &region)
        {
            return Some(TextEdit::new(range, new_text));
        }

        let gen_start = self.snapshot.position_at(change.span.start);
        let gen_end = self.snapshot.position_at(change.span.end());
        let is_new_import = gen_start.character == 0 && gen_end.line > gen_start.line;
        let mapped = if is_new_import {
            self.snapshot.original_position_shifted(gen_start, -1)
        } else {
            self.snapshot.original_position(gen_start)
        };

        let region_start = self.document.position_at(region.content.start);
        let insert_at = match mapped {
            Some(pos) if self.insertion_point_usable(pos, change, &region) => pos,
            _ => {
                debug!("auto-import edit unmappable, inserting at script region start");
                region_start
            }
        };

        // Prevents `<script>import {} from ''` malformation when the
        // insertion lands exactly at the region start.
        if insert_at == region_start && !new_text.starts_with(['\n', '\r']) {
            new_text.insert(0, '\n');
        }
        Some(TextEdit::insert(insert_at, new_text))
    }

    /// A mapped insertion point is usable when it lands inside the script
    /// region and is not the telltale wrong leading position a zero-length
    /// change sometimes maps to.
    fn insertion_point_usable(
        &self,
        position: Position,
        change: &TextChange,
        region: &TagRegion,
    ) -> bool {
        if change.span.is_empty()
            && position == Position::new(0, 0)
            && region.content.start != 0
        {
            return false;
        }
        self.document
            .offset_at(position)
            .is_some_and(|offset| region.contains_offset(offset))
    }

    fn range_in_region(&self, range: Range, region: &TagRegion) -> bool {
        let start = self.document.offset_at(range.start);
        let end = self.document.offset_at(range.end);
        matches!((start, end), (Some(s), Some(e))
            if region.contains_offset(s) && region.contains_offset(e))
    }
}

#[cfg(test)]
#[path = "../../tests/resolve_tests.rs"]
mod resolve_tests;
