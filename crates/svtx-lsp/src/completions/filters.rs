//! Trigger gating and raw-result suppression heuristics.
//!
//! This module isolates the decisions about whether a request should reach
//! the language service at all, and which raw entries are compilation
//! artifacts that must never surface to the user.

use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

/// Quoted members of a string-union type, e.g. `'small' | 'large'`.
static QUOTED_UNION_MEMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("union member pattern"));

impl<'a> Completions<'a> {
    /// Trigger gate: pure decision over the request inputs. Rejections are
    /// positions where the service's completions are meaningless.
    pub(super) fn is_eligible_trigger(
        &self,
        position: Position,
        trigger: CompletionTrigger,
    ) -> bool {
        // Non-templating embedded regions never complete through the
        // service.
        if self.document.is_in_style(position) {
            debug!("completion rejected: style region");
            return false;
        }

        if trigger.kind == CompletionTriggerKind::TriggerCharacter {
            let valid = trigger.character.is_some_and(|c| {
                ALLOWED_TRIGGER_CHARACTERS.contains(&c)
                    || c == DOC_TEMPLATE_TRIGGER
                    || c == EVENT_OR_SLOT_TRIGGER
            });
            if !valid {
                debug!(character = ?trigger.character, "completion rejected: trigger character");
                return false;
            }
        }

        // Plain text between element tags, including the exact `>|</` seam.
        if self.document.is_at_tag_seam(position)
            || self.document.is_plain_text_content(position)
        {
            debug!("completion rejected: markup text content");
            return false;
        }

        true
    }

    /// Drop compiler artifacts and apply the oversized-batch heuristics.
    /// `metadata_items` is only consulted for the narrowing decision; the
    /// caller owns the merge.
    pub(super) fn filter_raw_entries(
        &self,
        entries: Vec<RawCompletionEntry>,
        position: Position,
        tag: Option<&StartTagInfo>,
        metadata_items: &[CompletionItem],
    ) -> Vec<RawCompletionEntry> {
        let mut kept: Vec<RawCompletionEntry> = entries
            .into_iter()
            .filter(|entry| !Self::is_internal_entry(entry))
            .collect();

        // The cap classifies the batch as the service returned it (its
        // member-led check reads the first raw entry), so it must run
        // before the per-entry suppression below. Its outcome is final: a
        // member-led element batch is the attribute source itself, and the
        // narrowed component batch is synthesized prop entries.
        if kept.len() > MAX_RAW_ENTRIES {
            return self.cap_oversized_batch(kept, position, tag, metadata_items);
        }

        let in_element_tag = tag.is_some_and(|t| {
            !t.is_component && !matches!(t.attr_context, AttributeContext::Value { .. })
        });
        if in_element_tag {
            kept.retain(|entry| !Self::is_dom_attribute_like(entry));
        }
        kept
    }

    /// Compiler-injected scaffolding exists only to make the generated
    /// document type-check.
    pub(super) fn is_internal_entry(entry: &RawCompletionEntry) -> bool {
        entry.name.starts_with(RESERVED_INTERNAL_PREFIX)
            || SHIM_TYPE_NAMES.contains(&entry.name.as_str())
    }

    /// Generic object-member entries inside a plain element's start tag
    /// duplicate the HTML attribute source, and would surface events as
    /// `onX` instead of the language's `on:X` form. Component props are a
    /// different source and keep these kinds.
    pub(super) fn is_dom_attribute_like(entry: &RawCompletionEntry) -> bool {
        matches!(
            entry.kind,
            ScriptElementKind::Property
                | ScriptElementKind::MemberVariable
                | ScriptElementKind::Method
        )
    }

    /// Defensive cap for batches that look like a global-scope leak.
    fn cap_oversized_batch(
        &self,
        entries: Vec<RawCompletionEntry>,
        position: Position,
        tag: Option<&StartTagInfo>,
        metadata_items: &[CompletionItem],
    ) -> Vec<RawCompletionEntry> {
        let Some(tag) = tag else {
            return entries;
        };

        if !tag.is_component {
            // A plain element's start tag attracting hundreds of entries
            // whose first is not a member means the service fell back to
            // global scope; the whole batch is noise.
            let first_is_member = entries
                .first()
                .is_some_and(|e| e.kind == ScriptElementKind::MemberVariable);
            if !first_is_member {
                debug!(count = entries.len(), "discarding oversized element-tag batch");
                return Vec::new();
            }
            return entries;
        }

        if self.at_tag_attribute_boundary(position) {
            // Narrow instead of discarding: the user is adding an attribute
            // to a component, so its declared props are the useful answer.
            let props = self
                .components
                .component_at(self.document, position)
                .map(|c| c.props())
                .unwrap_or_default();
            debug!(
                count = entries.len(),
                props = props.len(),
                metadata = metadata_items.len(),
                "narrowing oversized component-tag batch to declared props"
            );
            return self.prop_entries_for(&props);
        }
        entries
    }

    /// Tag-boundary pattern around the cursor: double space, space-close or
    /// space-self-close.
    fn at_tag_attribute_boundary(&self, position: Position) -> bool {
        matches!(
            self.document.chars_around(position),
            (Some(' '), Some(' ')) | (Some(' '), Some('>')) | (Some(' '), Some('/'))
        )
    }

    /// Fallback for empty service results: inside a quoted attribute value
    /// bound to a component prop, and with the legacy transformation
    /// active, synthesize string completions from the prop's declared
    /// string-union type.
    pub(super) fn string_literal_prop_entries(
        &self,
        position: Position,
        tag: Option<&StartTagInfo>,
    ) -> Option<Vec<RawCompletionEntry>> {
        if !self.config.legacy_transformation {
            return None;
        }
        let tag = tag?;
        if !tag.is_component {
            return None;
        }
        let AttributeContext::Value { attr_name } = &tag.attr_context else {
            return None;
        };
        let component = self.components.component_at(self.document, position)?;
        let prop = component.prop(attr_name)?;

        let entries: Vec<RawCompletionEntry> = QUOTED_UNION_MEMBER
            .captures_iter(&prop.part_type)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| RawCompletionEntry::new(m.as_str(), ScriptElementKind::String))
            .collect();
        if entries.is_empty() {
            None
        } else {
            trace!(prop = %prop.name, count = entries.len(), "string-literal prop fallback");
            Some(entries)
        }
    }
}
