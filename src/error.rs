//! Error taxonomy surfaced by the annotation session.

use crate::state::PointKind;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, AnnotationError>;

/// Everything an annotation operation can fail with.
///
/// None of these are fatal; the display layer reports them in the status bar
/// and the session stays usable.
#[derive(Debug)]
pub enum AnnotationError {
    /// The folder does not exist, is not a directory or cannot be listed.
    NotFound(PathBuf),
    /// The folder holds no supported frames.
    EmptyFolder(PathBuf),
    /// The sidecar file exists but could not be parsed.
    CorruptAnnotationFile { path: PathBuf, reason: String },
    /// A point was placed outside the current image.
    OutOfBounds {
        kind: PointKind,
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },
    /// Writing the sidecar file failed. The in-memory edit is kept.
    PersistenceWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The operation needs an open folder.
    NoFolderOpen,
    /// The current image header could not be read.
    ImageRead { path: PathBuf, reason: String },
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationError::NotFound(path) => {
                write!(f, "Folder not found: {}", path.display())
            }
            AnnotationError::EmptyFolder(path) => {
                write!(f, "No images found in {}", path.display())
            }
            AnnotationError::CorruptAnnotationFile { path, reason } => {
                write!(f, "Corrupt annotation file {}: {reason}", path.display())
            }
            AnnotationError::OutOfBounds {
                kind,
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "{kind} point ({x:.1}, {y:.1}) is outside the {width}x{height} image"
            ),
            AnnotationError::PersistenceWrite { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
            AnnotationError::NoFolderOpen => write!(f, "No folder open"),
            AnnotationError::ImageRead { path, reason } => {
                write!(f, "Failed to read image {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for AnnotationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnnotationError::PersistenceWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_the_point() {
        let err = AnnotationError::OutOfBounds {
            kind: PointKind::Anterior,
            x: -5.0,
            y: 10.0,
            width: 100,
            height: 100,
        };
        assert_eq!(
            err.to_string(),
            "Anterior point (-5.0, 10.0) is outside the 100x100 image"
        );
    }

    #[test]
    fn write_failure_exposes_io_source() {
        let err = AnnotationError::PersistenceWrite {
            path: PathBuf::from("/tmp/ap.points"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("ap.points"));
    }
}
