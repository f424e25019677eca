//! In-memory annotation store and the `ap.points` sidecar file.
//!
//! The sidecar is JSON indented with four spaces:
//!
//! ```json
//! {
//!     "rois": [
//!         {
//!             "z": 0,
//!             "id": 0,
//!             "pos": [
//!                 120.5,
//!                 88.0
//!             ],
//!             "image": "0.png"
//!         }
//!     ]
//! }
//! ```
//!
//! `id` is 0 for the posterior and 1 for the anterior point, `z` is the
//! frame index and `image` the frame filename. Files written before the
//! `image` field existed are resolved through `z`; entries whose `z` is past
//! the last frame are kept as they are and written back unchanged.
//! Unannotated frames have no entry.

use crate::error::{AnnotationError, Result};
use crate::state::types::{AnnotationRecord, FrameEntry, Point, PointKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Default sidecar file name inside an annotated folder.
pub const DEFAULT_SIDECAR_FILE_NAME: &str = "ap.points";

#[derive(Debug, Serialize, Deserialize)]
struct SidecarFile {
    rois: Vec<SidecarRoi>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SidecarRoi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z: Option<usize>,
    id: u8,
    pos: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

/// Annotation records of one folder, keyed by image filename.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    records: HashMap<String, AnnotationRecord>,
    /// Legacy entries whose `z` matches no frame of the folder.
    unresolved: Vec<SidecarRoi>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, image_filename: &str) -> Option<&AnnotationRecord> {
        self.records.get(image_filename)
    }

    /// The record for `image_filename`, empty when it was never annotated.
    pub fn record_for(&self, image_filename: &str) -> AnnotationRecord {
        self.records
            .get(image_filename)
            .cloned()
            .unwrap_or_else(|| AnnotationRecord::empty(image_filename))
    }

    /// Returns whether the store changed.
    pub fn set_point(&mut self, image_filename: &str, kind: PointKind, point: Point) -> bool {
        self.records
            .entry(image_filename.to_string())
            .or_insert_with(|| AnnotationRecord::empty(image_filename))
            .set_point(kind, point)
    }

    /// Returns whether the store changed. Records left without points are removed.
    pub fn clear_point(&mut self, image_filename: &str, kind: PointKind) -> bool {
        let Some(record) = self.records.get_mut(image_filename) else {
            return false;
        };
        let changed = record.clear_point(kind);
        if record.is_empty() {
            self.records.remove(image_filename);
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationRecord> {
        self.records.values()
    }

    /// Number of legacy points that could not be matched to a frame.
    pub fn unresolved_len(&self) -> usize {
        self.unresolved.len()
    }

    /// Load the sidecar at `path`. A missing file yields an empty store.
    pub fn load(path: &Path, frames: &[FrameEntry]) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(AnnotationError::CorruptAnnotationFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };
        Self::parse(&text, frames).map_err(|reason| AnnotationError::CorruptAnnotationFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse sidecar text, resolving legacy `z`-only entries against `frames`.
    pub fn parse(text: &str, frames: &[FrameEntry]) -> std::result::Result<Self, String> {
        let parsed: SidecarFile = serde_json::from_str(text).map_err(|e| e.to_string())?;

        let mut store = Self::new();
        for roi in parsed.rois {
            let kind = PointKind::from_roi_id(roi.id)
                .ok_or_else(|| format!("unknown point id {}", roi.id))?;
            let image = match (roi.image.clone(), roi.z) {
                (Some(image), _) => image,
                (None, Some(z)) => match frames.get(z) {
                    Some(frame) => frame.file_name.clone(),
                    None => {
                        log::warn!("{kind} point for frame {z} matches no frame; keeping it as is");
                        store.unresolved.push(roi);
                        continue;
                    }
                },
                (None, None) => return Err("entry has neither `image` nor `z`".into()),
            };
            store.set_point(&image, kind, Point::new(roi.pos.0, roi.pos.1));
        }
        Ok(store)
    }

    /// Serialize to sidecar text: frames in folder order, orphans after by
    /// name, unresolved legacy entries last.
    pub fn to_sidecar_string(&self, frames: &[FrameEntry]) -> serde_json::Result<String> {
        let mut rois = Vec::new();
        let mut push = |record: &AnnotationRecord, z: Option<usize>| {
            for kind in PointKind::ALL {
                if let Some(p) = record.point(kind) {
                    rois.push(SidecarRoi {
                        z,
                        id: kind.roi_id(),
                        pos: (p.x, p.y),
                        image: Some(record.image_filename.clone()),
                    });
                }
            }
        };

        for (z, frame) in frames.iter().enumerate() {
            if let Some(record) = self.records.get(&frame.file_name) {
                push(record, Some(z));
            }
        }

        let mut orphans: Vec<&AnnotationRecord> = self
            .records
            .values()
            .filter(|r| !frames.iter().any(|f| f.file_name == r.image_filename))
            .collect();
        orphans.sort_by(|a, b| a.image_filename.cmp(&b.image_filename));
        for record in orphans {
            push(record, None);
        }
        rois.extend(self.unresolved.iter().cloned());

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        SidecarFile { rois }.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the sidecar atomically: temp file in the same folder, then rename.
    pub fn save(&self, path: &Path, frames: &[FrameEntry]) -> Result<()> {
        self.to_sidecar_string(frames)
            .map_err(io::Error::from)
            .and_then(|text| write_atomic(path, text.as_bytes()))
            .map_err(|source| AnnotationError::PersistenceWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".ap-points-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
