//! Plain data types shared by the session, the store and the display layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A position in image pixel space. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when the point lies on a `width` x `height` image.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.x >= 0.0
            && self.y >= 0.0
            && self.x < f64::from(width)
            && self.y < f64::from(height)
    }
}

/// The two glottal midline landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointKind {
    Posterior,
    Anterior,
}

impl PointKind {
    /// Both kinds in sidecar order.
    pub const ALL: [PointKind; 2] = [PointKind::Posterior, PointKind::Anterior];

    /// Numeric id used in the sidecar file.
    pub const fn roi_id(self) -> u8 {
        match self {
            PointKind::Posterior => 0,
            PointKind::Anterior => 1,
        }
    }

    pub const fn from_roi_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(PointKind::Posterior),
            1 => Some(PointKind::Anterior),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PointKind::Posterior => "Posterior",
            PointKind::Anterior => "Anterior",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annotation of a single image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationRecord {
    pub image_filename: String,
    pub anterior_point: Option<Point>,
    pub posterior_point: Option<Point>,
}

impl AnnotationRecord {
    /// A record with both points absent.
    pub fn empty(image_filename: impl Into<String>) -> Self {
        Self {
            image_filename: image_filename.into(),
            anterior_point: None,
            posterior_point: None,
        }
    }

    pub fn point(&self, kind: PointKind) -> Option<Point> {
        match kind {
            PointKind::Anterior => self.anterior_point,
            PointKind::Posterior => self.posterior_point,
        }
    }

    fn slot(&mut self, kind: PointKind) -> &mut Option<Point> {
        match kind {
            PointKind::Anterior => &mut self.anterior_point,
            PointKind::Posterior => &mut self.posterior_point,
        }
    }

    /// Stores `point`, returning whether the record changed.
    pub fn set_point(&mut self, kind: PointKind, point: Point) -> bool {
        let slot = self.slot(kind);
        if *slot == Some(point) {
            return false;
        }
        *slot = Some(point);
        true
    }

    /// Removes a point, returning whether one was present.
    pub fn clear_point(&mut self, kind: PointKind) -> bool {
        self.slot(kind).take().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.anterior_point.is_none() && self.posterior_point.is_none()
    }
}

/// One frame of the opened folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEntry {
    pub file_name: String,
    pub image_path: PathBuf,
    /// Segmentation mask belonging to this frame, if the folder has one.
    pub mask_path: Option<PathBuf>,
}

/// Direction for single-step navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Folder, frame list and position of the active session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub folder_path: PathBuf,
    pub entries: Vec<FrameEntry>,
    pub current_index: usize,
    pub sidecar_path: PathBuf,
}

impl SessionState {
    pub fn current_entry(&self) -> &FrameEntry {
        &self.entries[self.current_index]
    }

    pub fn folder(&self) -> &Path {
        &self.folder_path
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.file_name.as_str())
    }
}
