//! Component metadata seam.
//!
//! Event and slot completions come from statically known component
//! structure, not from the language service. The provider behind this seam
//! owns that introspection.

use svtx_common::Position;

use crate::document::Document;

/// One declared part of a component: an event, a slot-let or a prop.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPartInfo {
    pub name: String,
    /// Rendered type of the part, e.g. `CustomEvent<string>`.
    pub part_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl ComponentPartInfo {
    pub fn new(name: impl Into<String>, part_type: impl Into<String>) -> Self {
        ComponentPartInfo {
            name: name.into(),
            part_type: part_type.into(),
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Introspection over one component's declared surface.
pub trait ComponentInfoProvider {
    fn events(&self) -> Vec<ComponentPartInfo>;
    fn slot_lets(&self) -> Vec<ComponentPartInfo>;
    fn props(&self) -> Vec<ComponentPartInfo>;

    /// A single declared prop by name.
    fn prop(&self, name: &str) -> Option<ComponentPartInfo> {
        self.props().into_iter().find(|p| p.name == name)
    }
}

/// Lookup of the component referenced at a document position, if any.
pub trait ComponentRegistry {
    fn component_at(
        &self,
        document: &Document,
        position: Position,
    ) -> Option<&dyn ComponentInfoProvider>;
}

/// Registry that knows no components. Useful for hosts without metadata.
#[derive(Debug, Default)]
pub struct EmptyRegistry;

impl ComponentRegistry for EmptyRegistry {
    fn component_at(
        &self,
        _document: &Document,
        _position: Position,
    ) -> Option<&dyn ComponentInfoProvider> {
        None
    }
}
