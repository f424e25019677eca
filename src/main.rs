slint::include_modules!();

mod callbacks;
mod utils;

use ap_annotator::AnnotationSession;
use ap_annotator::config::{AppConfig, config_path, load_config};
use callbacks::file_ops::{ConfigHandle, SharedConfig};
use callbacks::{FrameLoader, SharedSession};
use clap::Parser;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Mark the anterior and posterior glottal midline points on BAGLS frames.
#[derive(Debug, Parser)]
#[command(name = "ap-annotator", version, about)]
struct Cli {
    /// Folder to open on startup
    folder: Option<PathBuf>,

    /// Config file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn apply_appearance(ui: &AppWindow, config: &AppConfig) {
    let appearance = &config.appearance;
    match utils::parse_color(&appearance.posterior_color) {
        Some(color) => ui.set_posterior_color(color),
        None => log::warn!("Invalid posterior_color {:?}", appearance.posterior_color),
    }
    match utils::parse_color(&appearance.anterior_color) {
        Some(color) => ui.set_anterior_color(color),
        None => log::warn!("Invalid anterior_color {:?}", appearance.anterior_color),
    }
    ui.set_marker_size(appearance.marker_size.max(2.0));
}

/// Loader that shows the session's current frame with its markers.
fn frame_loader(ui: &AppWindow, session: SharedSession, placeholder: slint::Image) -> FrameLoader {
    let ui_weak = ui.as_weak();
    Rc::new(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let session = session.borrow();
        let Some(state) = session.state() else { return };
        let index = state.current_index;
        let entry = state.current_entry();

        let (image, status_msg) = match slint::Image::load_from_path(&entry.image_path) {
            Ok(img) => {
                let size = img.size();
                let msg = format!("z: {} x: {} y: {}", index, size.width, size.height);
                (img, msg)
            }
            Err(_) => {
                log::warn!("Failed to load {}", entry.image_path.display());
                (
                    placeholder.clone(),
                    format!("Image not found: {}", entry.image_path.display()),
                )
            }
        };
        let size = image.size();
        ui.set_image_source(image);
        ui.set_image_width(size.width.max(1) as f32);
        ui.set_image_height(size.height.max(1) as f32);

        let mask = entry
            .mask_path
            .as_ref()
            .and_then(|p| slint::Image::load_from_path(p).ok());
        ui.set_has_mask(mask.is_some());
        ui.set_mask_source(mask.unwrap_or_else(|| placeholder.clone()));

        ui.set_current_image_name(entry.file_name.as_str().into());
        ui.set_dataset_position(format!("{} / {}", index + 1, state.entries.len()).into());
        ui.set_image_count(state.entries.len() as i32);
        ui.set_slider_value(index as f32);
        ui.set_status_text(status_msg.into());

        utils::sync_markers(&ui, &session);
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config_file = cli.config.or_else(config_path);
    let config = config_file
        .as_deref()
        .map(load_config)
        .unwrap_or_default();

    let ui = AppWindow::new()?;
    apply_appearance(&ui, &config);

    let placeholder = utils::placeholder_image();
    ui.set_image_source(placeholder.clone());

    let session: SharedSession = Rc::new(RefCell::new(AnnotationSession::new(
        config.dataset.session_options(),
    )));
    let config: SharedConfig = Rc::new(RefCell::new(ConfigHandle {
        config,
        path: config_file,
    }));

    let loader = frame_loader(&ui, session.clone(), placeholder);

    callbacks::navigation::setup_navigation_callbacks(&ui, loader.clone(), session.clone());
    callbacks::annotation::setup_annotation_callbacks(&ui, loader.clone(), session.clone());
    callbacks::file_ops::setup_file_callbacks(&ui, loader.clone(), session.clone(), config.clone());

    match cli.folder {
        Some(folder) => {
            callbacks::file_ops::open_folder(&ui, &loader, &session, &config, &folder);
        }
        None => ui.set_status_text("No folder open (Ctrl+O to open one)".into()),
    }

    ui.run()?;

    if let Err(e) = session.borrow_mut().close() {
        log::error!("Unsaved annotations could not be written: {e}");
        anyhow::bail!(e);
    }
    Ok(())
}
