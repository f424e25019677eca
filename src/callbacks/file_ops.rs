//! File operation callbacks.
//!
//! Handles: open folder (dialog or command line) and explicit save.

use super::{FrameLoader, SharedSession};
use crate::AppWindow;
use ap_annotator::config::{AppConfig, add_recent_folder, save_config};
use slint::ComponentHandle;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Configuration plus the file it is persisted to, if any.
pub struct ConfigHandle {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
}

pub type SharedConfig = Rc<RefCell<ConfigHandle>>;

/// Sets up all file operation callbacks on the UI.
pub fn setup_file_callbacks(
    ui: &AppWindow,
    loader: FrameLoader,
    session: SharedSession,
    config: SharedConfig,
) {
    setup_open_folder(ui, loader, session.clone(), config);
    setup_save_annotations(ui, session);
}

/// Open `folder` in the session and refresh the window.
///
/// Failures leave the previous folder active and are shown in the status bar.
pub fn open_folder(
    ui: &AppWindow,
    loader: &FrameLoader,
    session: &SharedSession,
    config: &SharedConfig,
    folder: &Path,
) {
    let result = session.borrow_mut().open_folder(folder);
    match result {
        Ok(()) => {
            let title = format!("AP Annotator | Working on folder {}", folder.display());
            ui.set_window_title(title.into());
            loader();
            remember_folder(config, folder);
        }
        Err(e) => {
            log::warn!("Open failed: {e}");
            ui.set_status_text(e.to_string().into());
        }
    }
}

fn remember_folder(config: &SharedConfig, folder: &Path) {
    let mut handle = config.borrow_mut();
    let absolute = std::fs::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf());
    add_recent_folder(&mut handle.config, absolute.to_string_lossy().into_owned());
    if let Some(path) = handle.path.as_deref() {
        if let Err(e) = save_config(&handle.config, path) {
            log::warn!("{e:#}");
        }
    }
}

fn setup_open_folder(
    ui: &AppWindow,
    loader: FrameLoader,
    session: SharedSession,
    config: SharedConfig,
) {
    let ui_weak = ui.as_weak();
    ui.on_open_folder(move || {
        let Some(ui) = ui_weak.upgrade() else { return };

        let mut dialog = rfd::FileDialog::new().set_title("Open BAGLS folder");
        if let Some(start) = config.borrow().config.dataset.dialog_start_directory() {
            dialog = dialog.set_directory(start);
        }

        if let Some(folder) = dialog.pick_folder() {
            open_folder(&ui, &loader, &session, &config, &folder);
        }
    });
}

fn setup_save_annotations(ui: &AppWindow, session: SharedSession) {
    let ui_weak = ui.as_weak();
    ui.on_save_annotations(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let mut session = session.borrow_mut();
        let result = session.save();
        match result {
            Ok(()) => {
                if let Some(state) = session.state() {
                    let msg = format!("Points saved to {}", state.sidecar_path.display());
                    ui.set_status_text(msg.into());
                }
            }
            Err(e) => {
                log::error!("Save failed: {e}");
                ui.set_status_text(format!("Save failed: {e}").into());
            }
        }
    });
}
