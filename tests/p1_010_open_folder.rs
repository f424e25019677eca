// P1-010: Open a folder of frames
// Test: Open folders with and without images, sidecars and masks
// Expected: Frames are listed in a stable order starting at index 0

mod test_helpers;

use ap_annotator::{AnnotationError, AnnotationSession, SessionOptions};
use test_helpers::*;

#[test]
fn fresh_folder_starts_at_first_image_without_points() {
    let dir = create_folder(&["a.png", "b.png"]);
    let session = open_session(dir.path());

    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.image_count(), 2);
    let record = session.current_annotation().unwrap();
    assert_eq!(record.image_filename, "a.png");
    assert_eq!(record.anterior_point, None);
    assert_eq!(record.posterior_point, None);
    assert!(!dir.path().join("ap.points").exists());
}

#[test]
fn missing_folder_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = AnnotationSession::new(SessionOptions::default());
    let err = session.open_folder(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, AnnotationError::NotFound(_)));
    assert!(!session.is_open());
}

#[test]
fn file_path_is_not_found() {
    let dir = create_folder(&["0.png"]);
    let mut session = AnnotationSession::new(SessionOptions::default());
    let err = session.open_folder(dir.path().join("0.png")).unwrap_err();
    assert!(matches!(err, AnnotationError::NotFound(_)));
}

#[test]
fn folder_without_images_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    write_png(dir.path(), "0_seg.png", 10, 10);

    let mut session = AnnotationSession::new(SessionOptions::default());
    let err = session.open_folder(dir.path()).unwrap_err();
    assert!(matches!(err, AnnotationError::EmptyFolder(_)));
}

#[test]
fn numeric_frames_sort_by_value_and_masks_are_paired() {
    let dir = create_bagls_folder(12);
    write_png(dir.path(), "extra.png", 10, 10);

    let session = open_session(dir.path());
    let state = session.state().unwrap();
    let names: Vec<&str> = state.image_names().collect();
    assert_eq!(names.len(), 13);
    assert_eq!(&names[..3], ["0.png", "1.png", "2.png"]);
    assert_eq!(names[10], "10.png");
    assert_eq!(names[12], "extra.png");

    assert_eq!(
        state.entries[10].mask_path.as_deref(),
        Some(dir.path().join("10_seg.png").as_path())
    );
    assert_eq!(state.entries[12].mask_path, None);
}

#[test]
fn configured_extensions_are_honoured() {
    let dir = create_folder(&["0.png"]);
    image::RgbImage::new(20, 20)
        .save(dir.path().join("1.jpg"))
        .unwrap();

    let options = SessionOptions {
        image_extensions: vec!["png".into(), "jpg".into()],
        ..SessionOptions::default()
    };
    let mut session = AnnotationSession::new(options);
    session.open_folder(dir.path()).unwrap();
    assert_eq!(session.image_count(), 2);
}

#[test]
fn failed_open_keeps_previous_folder() {
    let first = create_folder(&["0.png", "1.png"]);
    let mut session = open_session(first.path());
    assert!(session.jump_to(1));

    let empty = tempfile::tempdir().unwrap();
    assert!(session.open_folder(empty.path()).is_err());

    let state = session.state().unwrap();
    assert_eq!(state.folder_path, first.path());
    assert_eq!(state.current_index, 1);
}

#[test]
fn switching_folders_resets_position_and_store() {
    let first = create_folder(&["0.png", "1.png"]);
    let second = create_folder(&["x.png"]);
    let mut session = open_session(first.path());
    session.jump_to(1);
    session
        .set_point(ap_annotator::PointKind::Anterior, ap_annotator::Point::new(1.0, 1.0))
        .unwrap();

    session.open_folder(second.path()).unwrap();
    assert_eq!(session.current_index(), Some(0));
    assert!(session.store().unwrap().is_empty());
    assert_eq!(session.current_annotation().unwrap().image_filename, "x.png");
}
