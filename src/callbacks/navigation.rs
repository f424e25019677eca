//! Navigation callbacks for frame traversal.
//!
//! Handles: next, prev, first, last and slider jumps. The session flushes
//! pending edits before the position changes.

use super::{FrameLoader, SharedSession};
use crate::AppWindow;
use ap_annotator::{AnnotationSession, Direction};

/// Sets up all navigation-related callbacks on the UI.
pub fn setup_navigation_callbacks(ui: &AppWindow, loader: FrameLoader, session: SharedSession) {
    setup_step(ui, loader.clone(), session.clone());
    setup_first_last(ui, loader.clone(), session.clone());
    setup_jump_to(ui, loader, session);
}

/// Runs `step` against the session and reloads the view if it moved.
fn move_and_reload(
    loader: &FrameLoader,
    session: &SharedSession,
    step: impl FnOnce(&mut AnnotationSession) -> bool,
) {
    // The borrow must end before the loader borrows the session again.
    let moved = step(&mut *session.borrow_mut());
    if moved {
        loader();
    }
}

fn setup_step(ui: &AppWindow, loader: FrameLoader, session: SharedSession) {
    let (next_loader, next_session) = (loader.clone(), session.clone());
    ui.on_next_image(move || {
        move_and_reload(&next_loader, &next_session, |s| s.navigate(Direction::Next));
    });

    ui.on_prev_image(move || {
        move_and_reload(&loader, &session, |s| s.navigate(Direction::Previous));
    });
}

fn setup_first_last(ui: &AppWindow, loader: FrameLoader, session: SharedSession) {
    let (first_loader, first_session) = (loader.clone(), session.clone());
    ui.on_first_image(move || {
        move_and_reload(&first_loader, &first_session, AnnotationSession::first);
    });

    ui.on_last_image(move || {
        move_and_reload(&loader, &session, AnnotationSession::last);
    });
}

fn setup_jump_to(ui: &AppWindow, loader: FrameLoader, session: SharedSession) {
    ui.on_jump_to(move |value| {
        if !value.is_finite() || value < 0.0 {
            return;
        }
        let index = value.round() as usize;
        move_and_reload(&loader, &session, |s| s.jump_to(index));
    });
}
