//! Completion configuration.
//!
//! Loading is the host's job; this crate only consumes the settled values.

/// Settings that influence completion translation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    /// `lang` attribute for a script region synthesized by auto-import when
    /// the document has none yet (e.g. `"ts"`). `None` emits a bare
    /// `<script>` tag.
    pub default_script_language: Option<String>,
    /// Whether the legacy document transformation is active. Gates the
    /// string-literal prop fallback, which only the legacy generated shape
    /// needs.
    pub legacy_transformation: bool,
}

impl CompletionConfig {
    /// The opening tag for a synthesized script region.
    pub fn script_open_tag(&self) -> String {
        match &self.default_script_language {
            Some(lang) if !lang.is_empty() => format!("<script lang=\"{}\">", lang),
            _ => "<script>".to_string(),
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_script_open_tag() {
        let config = CompletionConfig::default();
        assert_eq!(config.script_open_tag(), "<script>");

        let config = CompletionConfig {
            default_script_language: Some("ts".to_string()),
            ..Default::default()
        };
        assert_eq!(config.script_open_tag(), "<script lang=\"ts\">");
    }
}
