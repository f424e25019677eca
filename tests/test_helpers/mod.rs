// Test helper functions for creating annotation folders
#![allow(dead_code)]

use ap_annotator::{AnnotationSession, SessionOptions};
use std::path::Path;
use tempfile::TempDir;

/// Write a black RGB PNG of the given size
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save(dir.join(name))
        .expect("failed to write test image");
}

/// Create a folder holding 100x100 frames with the given names
pub fn create_folder(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for name in names {
        write_png(dir.path(), name, 100, 100);
    }
    dir
}

/// Create a BAGLS-like folder: `0.png`..`n-1.png` plus their `_seg` masks
pub fn create_bagls_folder(count: usize) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for i in 0..count {
        write_png(dir.path(), &format!("{i}.png"), 100, 100);
        write_png(dir.path(), &format!("{i}_seg.png"), 100, 100);
    }
    dir
}

/// Open `dir` in a fresh session with default options
pub fn open_session(dir: &Path) -> AnnotationSession {
    let mut session = AnnotationSession::new(SessionOptions::default());
    session.open_folder(dir).expect("failed to open folder");
    session
}

/// Contents of the sidecar file in `dir`
pub fn read_sidecar(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("ap.points")).expect("failed to read sidecar")
}
