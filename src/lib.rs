//! Core of the AP annotator.
//!
//! The display layer (the `ap-annotator` binary) drives an [`AnnotationSession`]:
//! it opens a folder of BAGLS frames, steps between them and places the
//! anterior and posterior glottal midline points. Every point change is
//! written straight through to the folder's `ap.points` sidecar file.

pub mod config;
pub mod error;
pub mod state;

pub use error::{AnnotationError, Result};
pub use state::*;
