use super::*;
use crate::foundation::time::DEFAULT_ZOOM_RANGE;
use crate::timeline::model::{ElementKind, ImageProps, Trim, VideoProps};
use kurbo::Point;

const RANGE: f64 = DEFAULT_ZOOM_RANGE;

fn image(priority: i64, start: i64, duration: i64) -> Element {
    Element {
        priority,
        start_time: start,
        duration,
        location: Point::new(0.0, 0.0),
        width: 100.0,
        height: 100.0,
        rotation: 0.0,
        opacity: 100.0,
        animation: Default::default(),
        kind: ElementKind::Image(ImageProps { path: "a.png".into() }),
    }
}

fn video(priority: i64, start: i64, duration: i64, trim: Trim) -> Element {
    Element {
        kind: ElementKind::Video(VideoProps {
            path: "a.mp4".into(),
            trim,
            speed: 1.0,
            filter: Default::default(),
            audio_exists: false,
        }),
        ..image(priority, start, duration)
    }
}

#[test]
fn snaps_start_edge_to_neighbor_end_exactly() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 0, 1000));
    // 1000ms is 45px at the default zoom; 1100ms is ~50px, well within the
    // 10px tolerance of A's end edge.
    tl.insert("b".into(), image(2, 1100, 1000));

    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(out.snapped);
    assert_eq!(out.start_time, 1000);
}

#[test]
fn far_edges_do_not_snap() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 0, 1000));
    tl.insert("b".into(), image(2, 5000, 1000));

    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(!out.snapped);
    assert_eq!(out.start_time, 5000);
}

#[test]
fn tolerance_is_strict_at_ten_pixels() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 0, 1000));
    // A's end edge sits at 45px. A start edge at exactly 55px (10px away)
    // must not snap; 54px must.
    let at_px = |px: i64| px_to_ms(px, RANGE);
    tl.insert("b".into(), image(2, at_px(55), 1000));
    assert!(!magnet(&tl, &"b".into(), RANGE).unwrap().snapped);

    tl.insert("b".into(), image(2, at_px(54), 1000));
    assert!(magnet(&tl, &"b".into(), RANGE).unwrap().snapped);
}

#[test]
fn end_edge_snap_compensates_bar_length() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 2000, 1000));
    // B's end edge (at 1050ms) approaches A's start edge (2000ms).
    tl.insert("b".into(), image(2, 1100, 1000));
    // 1100+1000=2100ms end edge vs A's 2000ms start: ~4.5px apart.
    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(out.snapped);
    assert_eq!(out.start_time + 1000, 2000);
}

#[test]
fn dynamic_target_snaps_trimmed_bar() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 0, 1000));
    // Bar start is start + trim.start = 1080ms, near A's 1000ms end edge.
    tl.insert(
        "b".into(),
        video(2, 580, 4000, Trim { start: 500, end: 3000 }),
    );
    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(out.snapped);
    // Committed start puts the trimmed bar edge exactly on A's end edge in
    // pixel space.
    assert_eq!(
        ms_to_px(out.start_time + 500, RANGE),
        ms_to_px(1000, RANGE)
    );
}

#[test]
fn dynamic_neighbor_exposes_trimmed_edges() {
    let mut tl = Timeline::new();
    // A's trimmed bar spans [500, 3000]ms.
    tl.insert(
        "a".into(),
        video(1, 0, 4000, Trim { start: 500, end: 3000 }),
    );
    tl.insert("b".into(), image(2, 3100, 1000));
    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(out.snapped);
    assert_eq!(out.start_time, 3000);
}

#[test]
fn later_neighbors_override_earlier_matches() {
    let mut tl = Timeline::new();
    tl.insert("a".into(), image(1, 0, 1000));
    tl.insert("c".into(), image(3, 0, 1100));
    tl.insert("b".into(), image(2, 1050, 1000));
    let out = magnet(&tl, &"b".into(), RANGE).unwrap();
    assert!(out.snapped);
    // Insertion order is a, c, b: c's 1100ms end edge is checked after a's
    // 1000ms end edge and wins the commit.
    assert_eq!(ms_to_px(out.start_time, RANGE), ms_to_px(1100, RANGE));
}

#[test]
fn unknown_target_is_none() {
    let tl = Timeline::new();
    assert!(magnet(&tl, &"ghost".into(), RANGE).is_none());
}
