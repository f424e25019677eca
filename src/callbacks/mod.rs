//! Callback handlers for the annotator window.
//!
//! - `navigation` - next/prev/first/last and slider jumps
//! - `annotation` - placing, clearing and toggling the two points
//! - `file_ops` - opening a folder and saving

pub mod annotation;
pub mod file_ops;
pub mod navigation;

use ap_annotator::AnnotationSession;
use std::cell::RefCell;
use std::rc::Rc;

/// Reloads the current frame, its markers and the position widgets.
pub type FrameLoader = Rc<dyn Fn()>;

pub type SharedSession = Rc<RefCell<AnnotationSession>>;
