//! Completion translation engine for Svelte-style templating documents.
//!
//! Documents in the templating language are compiled, out of band, into a
//! generated TSX representation that a TypeScript-like language service can
//! type-check. The editor only ever sees original-document coordinates; the
//! language service only ever sees generated-document coordinates. This
//! crate sits between the two:
//! - decides whether a completion request should reach the service at all
//! - maps the cursor into the generated document
//! - filters compiler artifacts out of the raw results
//! - translates accepted results (labels, text edits) back into original
//!   coordinates
//! - merges in event/slot completions derived from component metadata
//! - resolves selected items on demand (detail, docs, auto-import edits)

pub mod config;
pub mod document;
pub mod snapshot;
pub mod service;
pub mod metadata;
pub mod docs;
pub mod completions;

pub use completions::{CompletionItem, CompletionList, Completions, LastCompletion};
pub use config::CompletionConfig;
pub use document::Document;
pub use snapshot::{SourceMapper, TsxSnapshot};
