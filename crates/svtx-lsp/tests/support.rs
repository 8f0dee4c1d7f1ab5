//! Shared fixtures for the unit tests: a canned language service, a static
//! component registry and a harness bundling the per-document collaborators.

use std::cell::{Cell, RefCell};
use std::sync::Once;

use svtx_common::Position;

use crate::completions::Completions;
use crate::config::CompletionConfig;
use crate::docs::PlainMarkdown;
use crate::document::Document;
use crate::metadata::{ComponentInfoProvider, ComponentPartInfo, ComponentRegistry};
use crate::service::{
    CompletionEntryDetail, LanguageService, RawCompletionEntry, RawCompletionInfo, UserPreferences,
};
use crate::snapshot::{IdentityMapper, SourceMapper, TsxSnapshot};

/// Language service returning a fixed batch, with query accounting.
#[derive(Default)]
pub struct StaticService {
    pub entries: Vec<RawCompletionEntry>,
    pub detail: Option<CompletionEntryDetail>,
    pub query_count: Cell<u32>,
    pub last_preferences: RefCell<Option<UserPreferences>>,
}

impl StaticService {
    pub fn with_entries(entries: Vec<RawCompletionEntry>) -> Self {
        StaticService {
            entries,
            ..Default::default()
        }
    }
}

impl LanguageService for StaticService {
    fn completions_at(
        &self,
        _offset: u32,
        _trigger_character: Option<char>,
        _preferences: &UserPreferences,
    ) -> Option<RawCompletionInfo> {
        self.query_count.set(self.query_count.get() + 1);
        if self.entries.is_empty() {
            None
        } else {
            Some(RawCompletionInfo {
                entries: self.entries.clone(),
            })
        }
    }

    fn completion_detail(
        &self,
        _offset: u32,
        _name: &str,
        _source: Option<&str>,
        preferences: &UserPreferences,
    ) -> Option<CompletionEntryDetail> {
        *self.last_preferences.borrow_mut() = Some(preferences.clone());
        self.detail.clone()
    }
}

/// Fixed component surface.
#[derive(Default)]
pub struct StaticComponent {
    pub events: Vec<ComponentPartInfo>,
    pub slot_lets: Vec<ComponentPartInfo>,
    pub props: Vec<ComponentPartInfo>,
}

impl ComponentInfoProvider for StaticComponent {
    fn events(&self) -> Vec<ComponentPartInfo> {
        self.events.clone()
    }

    fn slot_lets(&self) -> Vec<ComponentPartInfo> {
        self.slot_lets.clone()
    }

    fn props(&self) -> Vec<ComponentPartInfo> {
        self.props.clone()
    }
}

/// Registry knowing exactly one component by tag name.
#[derive(Default)]
pub struct SingleComponentRegistry {
    pub tag: String,
    pub component: StaticComponent,
}

impl ComponentRegistry for SingleComponentRegistry {
    fn component_at(
        &self,
        document: &Document,
        position: Position,
    ) -> Option<&dyn ComponentInfoProvider> {
        let tag = document.tag_at(position)?;
        (tag.name == self.tag).then_some(&self.component as &dyn ComponentInfoProvider)
    }
}

/// All per-document collaborators for one test, identity-mapped by default.
pub struct Harness {
    pub document: Document,
    pub snapshot: TsxSnapshot,
    pub service: StaticService,
    pub registry: SingleComponentRegistry,
    pub markdown: PlainMarkdown,
    pub config: CompletionConfig,
}

impl Harness {
    /// Document and generated text identical, mapped one-to-one.
    pub fn new(text: &str) -> Self {
        init_tracing();
        Harness {
            document: Document::new("/src/App.svelte", text),
            snapshot: TsxSnapshot::new(text, Box::new(IdentityMapper)),
            service: StaticService::default(),
            registry: SingleComponentRegistry::default(),
            markdown: PlainMarkdown,
            config: CompletionConfig::default(),
        }
    }

    pub fn with_mapper(text: &str, mapper: Box<dyn SourceMapper + Send + Sync>) -> Self {
        let mut harness = Harness::new(text);
        harness.snapshot = TsxSnapshot::new(text, mapper);
        harness
    }

    pub fn provider(&self) -> Completions<'_> {
        Completions::new(
            &self.document,
            &self.snapshot,
            &self.service,
            &self.registry,
            &self.markdown,
            &self.config,
        )
    }
}

/// Route engine logs through the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}
