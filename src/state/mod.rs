//! State management for the annotator.
//!
//! This module contains:
//! - Points, point kinds and per-image annotation records
//! - Folder scanning and frame ordering
//! - The annotation store and its `ap.points` sidecar codec
//! - The annotation session that ties them together

mod dataset;
mod session;
mod store;
mod types;

pub use dataset::*;
pub use session::*;
pub use store::*;
pub use types::*;
