//! Point placement callbacks.
//!
//! Handles: canvas clicks, clear, show/hide toggles and restore.
//! Left click places the posterior point, right click the anterior point,
//! middle click moves to the next frame.

use super::{FrameLoader, SharedSession};
use crate::AppWindow;
use crate::utils::{point_kind, sync_markers};
use ap_annotator::{AnnotationError, AnnotationSession, Direction, Point, PointKind};
use slint::ComponentHandle;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Points hidden with the `1`/`2` toggles, so they can be shown again.
#[derive(Debug, Default)]
pub struct HiddenPoints {
    points: HashMap<(String, PointKind), Point>,
}

impl HiddenPoints {
    fn hide(&mut self, image: &str, kind: PointKind, point: Point) {
        self.points.insert((image.to_string(), kind), point);
    }

    fn take(&mut self, image: &str, kind: PointKind) -> Option<Point> {
        self.points.remove(&(image.to_string(), kind))
    }

    fn forget(&mut self, image: &str, kind: PointKind) {
        self.points.remove(&(image.to_string(), kind));
    }
}

/// Sets up all annotation callbacks on the UI.
pub fn setup_annotation_callbacks(ui: &AppWindow, loader: FrameLoader, session: SharedSession) {
    let hidden = Rc::new(RefCell::new(HiddenPoints::default()));
    setup_canvas_pressed(ui, loader, session.clone(), hidden.clone());
    setup_clear_point(ui, session.clone(), hidden.clone());
    setup_toggle_point(ui, session.clone(), hidden.clone());
    setup_restore_points(ui, session, hidden);
}

fn current_name(session: &AnnotationSession) -> Option<String> {
    session.current_entry().map(|e| e.file_name.clone())
}

/// Shows the outcome of an edit. Failed writes keep the edit, so markers are
/// refreshed in every case.
fn report(
    ui: &AppWindow,
    session: &AnnotationSession,
    result: Result<(), AnnotationError>,
    ok: String,
) {
    sync_markers(ui, session);
    match result {
        Ok(()) => ui.set_status_text(ok.into()),
        Err(e @ AnnotationError::PersistenceWrite { .. }) => {
            log::error!("{e}");
            ui.set_status_text(format!("{e} (kept in memory, press Ctrl+S to retry)").into());
        }
        Err(e) => ui.set_status_text(e.to_string().into()),
    }
}

fn setup_canvas_pressed(
    ui: &AppWindow,
    loader: FrameLoader,
    session: SharedSession,
    hidden: Rc<RefCell<HiddenPoints>>,
) {
    let ui_weak = ui.as_weak();
    ui.on_canvas_pressed(move |x, y, button| {
        let Some(ui) = ui_weak.upgrade() else { return };

        if button == 2 {
            let moved = session.borrow_mut().navigate(Direction::Next);
            if moved {
                loader();
            }
            return;
        }

        let Some(kind) = point_kind(button) else { return };
        let mut session = session.borrow_mut();
        let point = Point::new(f64::from(x), f64::from(y));
        let result = session.set_point(kind, point);
        if result.is_ok() {
            if let Some(name) = current_name(&session) {
                hidden.borrow_mut().forget(&name, kind);
            }
        }
        report(
            &ui,
            &session,
            result,
            format!("{kind} point set to ({:.1}, {:.1})", point.x, point.y),
        );
    });
}

fn setup_clear_point(ui: &AppWindow, session: SharedSession, hidden: Rc<RefCell<HiddenPoints>>) {
    let ui_weak = ui.as_weak();
    ui.on_clear_point(move |index| {
        let (Some(ui), Some(kind)) = (ui_weak.upgrade(), point_kind(index)) else {
            return;
        };
        let mut session = session.borrow_mut();
        let result = session.clear_point(kind);
        if let Some(name) = current_name(&session) {
            hidden.borrow_mut().forget(&name, kind);
        }
        report(&ui, &session, result, format!("{kind} point cleared"));
    });
}

fn setup_toggle_point(ui: &AppWindow, session: SharedSession, hidden: Rc<RefCell<HiddenPoints>>) {
    let ui_weak = ui.as_weak();
    ui.on_toggle_point(move |index| {
        let (Some(ui), Some(kind)) = (ui_weak.upgrade(), point_kind(index)) else {
            return;
        };
        let mut session = session.borrow_mut();
        let (Some(name), Some(record)) = (current_name(&session), session.current_annotation())
        else {
            return;
        };

        if let Some(point) = record.point(kind) {
            let result = session.clear_point(kind);
            if result.is_ok() {
                hidden.borrow_mut().hide(&name, kind, point);
            }
            report(&ui, &session, result, format!("{kind} point hidden"));
        } else if let Some(point) = hidden.borrow_mut().take(&name, kind) {
            let result = session.set_point(kind, point);
            report(&ui, &session, result, format!("{kind} point shown"));
        }
    });
}

fn setup_restore_points(
    ui: &AppWindow,
    session: SharedSession,
    hidden: Rc<RefCell<HiddenPoints>>,
) {
    let ui_weak = ui.as_weak();
    ui.on_restore_points(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let mut session = session.borrow_mut();
        let Some(name) = current_name(&session) else { return };

        let mut result = Ok(());
        for kind in PointKind::ALL {
            if let Some(point) = hidden.borrow_mut().take(&name, kind) {
                result = result.and(session.set_point(kind, point));
            }
        }
        report(&ui, &session, result, "Hidden points shown".to_string());
    });
}
