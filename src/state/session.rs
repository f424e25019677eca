//! The annotation session: one opened folder, its frames, its store and the
//! current position.

use crate::error::{AnnotationError, Result};
use crate::state::dataset::{DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MASK_MARKER, scan_frames};
use crate::state::store::{AnnotationStore, DEFAULT_SIDECAR_FILE_NAME};
use crate::state::types::{AnnotationRecord, Direction, FrameEntry, Point, PointKind, SessionState};
use std::path::Path;

/// How a folder is scanned and where its annotations live.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub sidecar_file_name: String,
    pub image_extensions: Vec<String>,
    pub mask_marker: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sidecar_file_name: DEFAULT_SIDECAR_FILE_NAME.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            mask_marker: DEFAULT_MASK_MARKER.to_string(),
        }
    }
}

/// Everything that belongs to the opened folder. Replaced as a whole.
#[derive(Debug)]
struct OpenFolder {
    state: SessionState,
    store: AnnotationStore,
    dimensions: Vec<Option<(u32, u32)>>,
    /// Set while the store holds edits the sidecar does not.
    pending: bool,
}

impl OpenFolder {
    fn current_name(&self) -> &str {
        &self.state.current_entry().file_name
    }

    fn current_dimensions(&mut self) -> Result<(u32, u32)> {
        let index = self.state.current_index;
        if let Some(dims) = self.dimensions[index] {
            return Ok(dims);
        }
        let path = &self.state.entries[index].image_path;
        let dims = image::image_dimensions(path).map_err(|e| AnnotationError::ImageRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        self.dimensions[index] = Some(dims);
        Ok(dims)
    }

    fn persist(&mut self) -> Result<()> {
        self.pending = true;
        self.store
            .save(&self.state.sidecar_path, &self.state.entries)?;
        self.pending = false;
        log::debug!("Saved annotations to {}", self.state.sidecar_path.display());
        Ok(())
    }

    /// Write pending edits, if any.
    fn flush(&mut self) -> Result<()> {
        if self.pending {
            self.persist()?;
        }
        Ok(())
    }

    fn flush_before_leaving(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("Annotations still unsaved: {e}");
        }
    }
}

/// Workflow manager behind the display layer.
///
/// Single-threaded; every call completes its file IO before returning.
#[derive(Debug, Default)]
pub struct AnnotationSession {
    options: SessionOptions,
    open: Option<OpenFolder>,
}

impl AnnotationSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            open: None,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Open `path`, replacing the current folder only if the open succeeds.
    ///
    /// A corrupt sidecar aborts the open so that it is never overwritten.
    /// Pending edits of the previous folder must reach its sidecar first;
    /// if they cannot, the open fails and the previous folder stays open.
    pub fn open_folder(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let folder = path.as_ref();
        let entries = scan_frames(
            folder,
            &self.options.image_extensions,
            &self.options.mask_marker,
        )?;
        if entries.is_empty() {
            return Err(AnnotationError::EmptyFolder(folder.to_path_buf()));
        }

        let sidecar_path = folder.join(&self.options.sidecar_file_name);
        let store = AnnotationStore::load(&sidecar_path, &entries)?;

        if let Some(previous) = self.open.as_mut() {
            previous.flush()?;
        }
        log::info!(
            "Opened {} ({} frames, {} annotated)",
            folder.display(),
            entries.len(),
            store.len()
        );

        let count = entries.len();
        self.open = Some(OpenFolder {
            state: SessionState {
                folder_path: folder.to_path_buf(),
                entries,
                current_index: 0,
                sidecar_path,
            },
            store,
            dimensions: vec![None; count],
            pending: false,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.open.as_ref().map(|o| &o.state)
    }

    pub fn store(&self) -> Option<&AnnotationStore> {
        self.open.as_ref().map(|o| &o.store)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state().map(|s| s.current_index)
    }

    pub fn image_count(&self) -> usize {
        self.state().map_or(0, |s| s.entries.len())
    }

    pub fn current_entry(&self) -> Option<&FrameEntry> {
        self.state().map(SessionState::current_entry)
    }

    /// True while an edit has not reached the sidecar file.
    pub fn has_pending_changes(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.pending)
    }

    /// Step one frame. Returns `false` at either end or without a folder.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let Some(index) = self.current_index() else {
            return false;
        };
        let target = match direction {
            Direction::Next => index + 1,
            Direction::Previous => match index.checked_sub(1) {
                Some(i) => i,
                None => return false,
            },
        };
        self.jump_to(target)
    }

    pub fn first(&mut self) -> bool {
        self.jump_to(0)
    }

    pub fn last(&mut self) -> bool {
        let count = self.image_count();
        count > 0 && self.jump_to(count - 1)
    }

    /// Move to `index`. Out-of-range indices leave the position unchanged.
    pub fn jump_to(&mut self, index: usize) -> bool {
        let Some(open) = self.open.as_mut() else {
            return false;
        };
        if index >= open.state.entries.len() || index == open.state.current_index {
            return false;
        }
        open.flush_before_leaving();
        open.state.current_index = index;
        true
    }

    /// Pixel size of the current frame, read from its header once.
    pub fn current_dimensions(&mut self) -> Result<(u32, u32)> {
        self.open
            .as_mut()
            .ok_or(AnnotationError::NoFolderOpen)?
            .current_dimensions()
    }

    /// Place a point on the current frame and write the sidecar.
    pub fn set_point(&mut self, kind: PointKind, point: Point) -> Result<()> {
        let open = self.open.as_mut().ok_or(AnnotationError::NoFolderOpen)?;
        let (width, height) = open.current_dimensions()?;
        if !point.is_within(width, height) {
            return Err(AnnotationError::OutOfBounds {
                kind,
                x: point.x,
                y: point.y,
                width,
                height,
            });
        }

        let name = open.current_name().to_string();
        if !open.store.set_point(&name, kind, point) && !open.pending {
            return Ok(());
        }
        log::debug!("{kind} point of {name} set to ({:.1}, {:.1})", point.x, point.y);
        open.persist()
    }

    /// Remove a point from the current frame. Absent points are a no-op.
    pub fn clear_point(&mut self, kind: PointKind) -> Result<()> {
        let open = self.open.as_mut().ok_or(AnnotationError::NoFolderOpen)?;
        let name = open.current_name().to_string();
        if !open.store.clear_point(&name, kind) && !open.pending {
            return Ok(());
        }
        log::debug!("{kind} point of {name} cleared");
        open.persist()
    }

    /// Record of the current frame; points absent when never annotated.
    pub fn current_annotation(&self) -> Option<AnnotationRecord> {
        let open = self.open.as_ref()?;
        Some(open.store.record_for(open.current_name()))
    }

    /// Write the sidecar now, whether or not anything is pending.
    pub fn save(&mut self) -> Result<()> {
        let open = self.open.as_mut().ok_or(AnnotationError::NoFolderOpen)?;
        open.persist()?;
        log::info!("Annotations saved to {}", open.state.sidecar_path.display());
        Ok(())
    }

    /// Flush pending edits and drop the folder. On failure the folder stays
    /// open so the edits are not lost.
    pub fn close(&mut self) -> Result<()> {
        if let Some(open) = self.open.as_mut() {
            open.flush()?;
        }
        self.open = None;
        Ok(())
    }
}
