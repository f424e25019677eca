//! Helpers shared by the display callbacks.

use crate::{AppWindow, Marker};
use ap_annotator::{AnnotationSession, Point, PointKind};
use slint::SharedPixelBuffer;

/// Checkerboard shown while no folder is open or a frame fails to load.
pub fn placeholder_image() -> slint::Image {
    const SIZE: u32 = 64;
    let mut buffer = SharedPixelBuffer::<slint::Rgb8Pixel>::new(SIZE, SIZE);
    let data = buffer.make_mut_bytes();
    for y in 0..SIZE {
        for x in 0..SIZE {
            let v = if (x / 8 + y / 8) % 2 == 0 { 60 } else { 110 };
            let i = ((y * SIZE + x) * 3) as usize;
            data[i..i + 3].fill(v);
        }
    }
    slint::Image::from_rgb8(buffer)
}

/// Parse a hex color string (e.g., "#1a87f4") to a Slint Color
pub fn parse_color(hex: &str) -> Option<slint::Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(slint::Color::from_rgb_u8(r, g, b))
}

/// Point kind for the integer the UI passes (0 posterior, 1 anterior).
pub fn point_kind(index: i32) -> Option<PointKind> {
    u8::try_from(index).ok().and_then(PointKind::from_roi_id)
}

fn marker_for(point: Option<Point>) -> Marker {
    match point {
        Some(p) => Marker {
            x: p.x as f32,
            y: p.y as f32,
            visible: true,
        },
        None => Marker {
            x: 0.0,
            y: 0.0,
            visible: false,
        },
    }
}

fn point_text(point: Option<Point>) -> String {
    match point {
        Some(p) => format!("({:.1}, {:.1})", p.x, p.y),
        None => "not set".to_string(),
    }
}

/// Push the current frame's points into the markers and side panel.
pub fn sync_markers(ui: &AppWindow, session: &AnnotationSession) {
    let record = session.current_annotation().unwrap_or_default();
    ui.set_posterior_marker(marker_for(record.posterior_point));
    ui.set_anterior_marker(marker_for(record.anterior_point));
    ui.set_posterior_text(point_text(record.posterior_point).into());
    ui.set_anterior_text(point_text(record.anterior_point).into());
}
