//! Folder scanning: finds the frames of a BAGLS sequence and their masks.

use crate::error::{AnnotationError, Result};
use crate::state::types::FrameEntry;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default extensions considered to be frames.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png"];

/// Default marker identifying segmentation masks (`0_seg.png`).
pub const DEFAULT_MASK_MARKER: &str = "seg";

/// Scan `folder` for frames.
///
/// Files with a numeric stem come first in numeric order, everything else
/// follows sorted by filename. Files whose stem contains `mask_marker` are
/// attached to their frame as `mask_path` instead of being listed.
pub fn scan_frames(
    folder: &Path,
    extensions: &[String],
    mask_marker: &str,
) -> Result<Vec<FrameEntry>> {
    if !folder.is_dir() {
        return Err(AnnotationError::NotFound(folder.to_path_buf()));
    }
    let entries = fs::read_dir(folder).map_err(|e| {
        log::warn!("Failed to read folder {}: {e}", folder.display());
        AnnotationError::NotFound(folder.to_path_buf())
    })?;

    let mut frames: Vec<(String, PathBuf)> = Vec::new();
    let mut masks: HashMap<String, PathBuf> = HashMap::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extensions) {
            continue;
        }
        let (Some(name), Some(stem)) = (
            path.file_name().and_then(|n| n.to_str()),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            log::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };

        if !mask_marker.is_empty() && stem.contains(mask_marker) {
            masks.insert(frame_stem_of_mask(stem, mask_marker), path.clone());
        } else {
            frames.push((name.to_string(), path.clone()));
        }
    }

    frames.sort_by(|a, b| compare_frame_names(&a.0, &b.0));
    warn_on_gaps(folder, &frames);

    Ok(frames
        .into_iter()
        .map(|(file_name, image_path)| {
            let mask_path = Path::new(&file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|stem| masks.get(stem).cloned());
            FrameEntry {
                file_name,
                image_path,
                mask_path,
            }
        })
        .collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// `0_seg` -> `0`
fn frame_stem_of_mask(stem: &str, mask_marker: &str) -> String {
    stem.replacen(mask_marker, "", 1)
        .trim_matches(|c| c == '_' || c == '-' || c == '.')
        .to_string()
}

fn numeric_stem(name: &str) -> Option<u64> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Ordering of frame file names: numeric stems first by value, then by name.
pub fn compare_frame_names(a: &str, b: &str) -> Ordering {
    match (numeric_stem(a), numeric_stem(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn warn_on_gaps(folder: &Path, frames: &[(String, PathBuf)]) {
    for (index, (name, _)) in frames.iter().enumerate() {
        match numeric_stem(name) {
            Some(n) if n == index as u64 => {}
            Some(n) => {
                log::warn!(
                    "Frame numbering in {} is not contiguous: {name} is at position {index} (expected {n})",
                    folder.display()
                );
                return;
            }
            None => return,
        }
    }
}
