//! Shared primitives for the svtx tooling.
//!
//! This crate provides the coordinate types used across the svtx crates:
//! - Line/column positions and ranges (`Position`, `Range`)
//! - Offset <-> position conversion (`LineMap`)
//! - Half-open byte spans (`TextSpan`)

pub mod position;
pub use position::{LineMap, Position, Range};

pub mod span;
pub use span::TextSpan;
