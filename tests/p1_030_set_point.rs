// P1-030: Place and clear points
// Test: Set, overwrite, clear and reject points on the current frame
// Expected: The store follows every edit and rejects points off the image

mod test_helpers;

use ap_annotator::{AnnotationError, Point, PointKind};
use test_helpers::*;

#[test]
fn out_of_bounds_point_is_rejected() {
    let dir = create_folder(&["a.png"]);
    let mut session = open_session(dir.path());

    let err = session
        .set_point(PointKind::Anterior, Point::new(-5.0, 10.0))
        .unwrap_err();
    assert!(matches!(
        err,
        AnnotationError::OutOfBounds {
            width: 100,
            height: 100,
            ..
        }
    ));
    assert!(session.store().unwrap().is_empty());
    assert!(!dir.path().join("ap.points").exists());

    for point in [
        Point::new(100.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(f64::INFINITY, 1.0),
    ] {
        assert!(session.set_point(PointKind::Posterior, point).is_err());
    }
    assert!(session.store().unwrap().is_empty());
}

#[test]
fn bounds_follow_each_frame_size() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "0.png", 40, 30);
    write_png(dir.path(), "1.png", 200, 150);
    let mut session = open_session(dir.path());

    assert_eq!(session.current_dimensions().unwrap(), (40, 30));
    assert!(session
        .set_point(PointKind::Posterior, Point::new(50.0, 10.0))
        .is_err());

    session.jump_to(1);
    assert_eq!(session.current_dimensions().unwrap(), (200, 150));
    session
        .set_point(PointKind::Posterior, Point::new(50.0, 10.0))
        .unwrap();
}

#[test]
fn setting_the_same_point_twice_is_idempotent() {
    let dir = create_folder(&["a.png"]);
    let mut session = open_session(dir.path());
    let point = Point::new(12.5, 40.25);

    session.set_point(PointKind::Posterior, point).unwrap();
    let before = session.current_annotation().unwrap();
    let file_before = read_sidecar(dir.path());

    session.set_point(PointKind::Posterior, point).unwrap();
    assert_eq!(session.current_annotation().unwrap(), before);
    assert_eq!(read_sidecar(dir.path()), file_before);
}

#[test]
fn setting_overwrites_previous_value() {
    let dir = create_folder(&["a.png"]);
    let mut session = open_session(dir.path());

    session
        .set_point(PointKind::Anterior, Point::new(1.0, 1.0))
        .unwrap();
    session
        .set_point(PointKind::Anterior, Point::new(2.0, 3.0))
        .unwrap();
    assert_eq!(
        session.current_annotation().unwrap().anterior_point,
        Some(Point::new(2.0, 3.0))
    );
    assert_eq!(session.store().unwrap().len(), 1);
}

#[test]
fn clearing_an_unset_point_is_a_noop() {
    let dir = create_folder(&["a.png"]);
    let mut session = open_session(dir.path());

    session.clear_point(PointKind::Posterior).unwrap();
    assert!(session.store().unwrap().is_empty());
    assert!(!dir.path().join("ap.points").exists());
}

#[test]
fn clearing_both_points_removes_the_record() {
    let dir = create_folder(&["a.png", "b.png"]);
    let mut session = open_session(dir.path());

    session
        .set_point(PointKind::Anterior, Point::new(1.0, 1.0))
        .unwrap();
    session
        .set_point(PointKind::Posterior, Point::new(2.0, 2.0))
        .unwrap();
    session.clear_point(PointKind::Anterior).unwrap();
    assert_eq!(session.store().unwrap().len(), 1);

    session.clear_point(PointKind::Posterior).unwrap();
    assert!(session.store().unwrap().is_empty());
    assert!(read_sidecar(dir.path()).contains("\"rois\": []"));
}
