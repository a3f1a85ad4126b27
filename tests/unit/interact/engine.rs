use super::*;
use crate::foundation::time::DEFAULT_ZOOM_RANGE;
use crate::timeline::model::{ImageProps, TextAlign, TextBackground, TextOutline, TextProps, VideoProps};
use crate::timeline::store::MemoryTimelineStore;
use kurbo::Point;

const RANGE: f64 = DEFAULT_ZOOM_RANGE;

fn view() -> TimelineView {
    TimelineView {
        range: RANGE,
        scroll_px: 0,
        vertical_scroll_px: 0,
    }
}

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

fn video(priority: i64, start: i64, duration: i64, trim: Trim, speed: f64) -> Element {
    Element {
        kind: ElementKind::Video(VideoProps {
            path: "a.mp4".into(),
            trim,
            speed,
            filter: Default::default(),
            audio_exists: false,
        }),
        ..image(priority, start, duration)
    }
}

fn caption(priority: i64, start: i64, parent: TextParent) -> Element {
    Element {
        kind: ElementKind::Text(TextProps {
            content: "hi".into(),
            color: crate::foundation::pixel::Rgba8::WHITE,
            font_px: 24.0,
            font_path: "f.ttf".into(),
            align: TextAlign::Left,
            bold: false,
            italic: false,
            letter_spacing: 0.0,
            background: TextBackground::default(),
            outline: TextOutline::default(),
            parent,
        }),
        ..image(priority, start, 1000)
    }
}

fn store_with(elements: Vec<(&str, Element)>) -> MemoryTimelineStore {
    let mut store = MemoryTimelineStore::new();
    for (id, element) in elements {
        store.add_element(id.into(), element);
    }
    store.checkpoint();
    store
}

struct RecordingPanel {
    calls: Vec<(Option<Category>, Vec<ElementId>)>,
}

impl OptionsPanel for RecordingPanel {
    fn show_options_for(&mut self, category: Option<Category>, ids: &[ElementId]) {
        self.calls.push((category, ids.to_vec()));
    }
}

// --- hit testing ---------------------------------------------------------

#[test]
fn hit_test_classifies_body_and_handles() {
    // Static image: bar spans 0..45px in row 0 (y 20..80).
    let store = store_with(vec![("a", image(1, 0, 1000))]);
    let engine = InteractionEngine::new();

    let hit = engine.hit_test(&store, &view(), 20.0, 50.0);
    assert_eq!(hit.target, Some("a".into()));
    assert_eq!(hit.kind, HitKind::Move);

    assert_eq!(engine.hit_test(&store, &view(), 2.0, 50.0).kind, HitKind::StretchStart);
    assert_eq!(engine.hit_test(&store, &view(), 44.0, 50.0).kind, HitKind::StretchEnd);

    // Above the row and past the bar end: nothing.
    assert_eq!(engine.hit_test(&store, &view(), 20.0, 10.0).kind, HitKind::None);
    assert_eq!(engine.hit_test(&store, &view(), 80.0, 50.0).kind, HitKind::None);
}

#[test]
fn hit_test_uses_sorted_rows() {
    let store = store_with(vec![
        ("b", image(2, 0, 1000)),
        ("a", image(1, 0, 1000)),
    ]);
    let engine = InteractionEngine::new();
    // Row 0 belongs to the lower priority element.
    assert_eq!(
        engine.hit_test(&store, &view(), 20.0, 50.0).target,
        Some("a".into())
    );
    assert_eq!(
        engine.hit_test(&store, &view(), 20.0, 110.0).target,
        Some("b".into())
    );
}

#[test]
fn hit_test_video_uses_trimmed_width_and_handles() {
    // Trimmed bar width is 113px; handles sit at the trim offsets 23/135px.
    let store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 500, end: 3000 }, 1.0),
    )]);
    let engine = InteractionEngine::new();

    assert_eq!(engine.hit_test(&store, &view(), 23.0, 50.0).kind, HitKind::StretchStart);
    assert_eq!(engine.hit_test(&store, &view(), 60.0, 50.0).kind, HitKind::Move);
    assert_eq!(engine.hit_test(&store, &view(), 200.0, 50.0).kind, HitKind::None);

    // With no leading trim the end handle sits at the trim-out offset.
    let store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 0, end: 3000 }, 1.0),
    )]);
    assert_eq!(engine.hit_test(&store, &view(), 135.0, 50.0).kind, HitKind::StretchEnd);
}

#[test]
fn hit_test_honors_scroll_offsets() {
    let store = store_with(vec![("a", image(1, 0, 1000))]);
    let engine = InteractionEngine::new();
    let scrolled = TimelineView {
        range: RANGE,
        scroll_px: 30,
        vertical_scroll_px: 60,
    };
    // Bar shifts left by 30px and the row up by 60px.
    let hit = engine.hit_test(&store, &scrolled, 5.0, 10.0);
    assert_eq!(hit.target, Some("a".into()));
    assert_eq!(engine.hit_test(&store, &scrolled, 5.0, 50.0).kind, HitKind::None);
}

#[test]
fn hit_test_parented_text_shifts_by_parent_start() {
    let mut store = store_with(vec![(
        "v",
        video(1, 2000, 4000, Trim { start: 0, end: 4000 }, 1.0),
    )]);
    store.add_element("cap".into(), caption(2, 0, TextParent::Element("v".into())));
    let engine = InteractionEngine::new();
    // Caption's own start is 0 but its bar is drawn 90px right (parent at
    // 2000ms); row 1.
    assert_eq!(engine.hit_test(&store, &view(), 20.0, 110.0).kind, HitKind::None);
    assert_eq!(
        engine.hit_test(&store, &view(), 110.0, 110.0).target,
        Some("cap".into())
    );
}

// --- selection -----------------------------------------------------------

#[test]
fn click_selects_and_notifies_panel() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = RecordingPanel { calls: Vec::new() };

    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    assert_eq!(engine.selection(), &["a".into()]);
    assert_eq!(panel.calls.len(), 1);
    assert_eq!(panel.calls[0].0, Some(Category::Image));
}

#[test]
fn shift_click_extends_selection() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    engine.pointer_up(&mut store);
    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 110.0, true);
    assert_eq!(engine.selection(), &["a".into(), "b".into()]);
}

#[test]
fn clicking_selected_element_keeps_group() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.set_selection(vec!["a".into(), "b".into()]);
    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    assert_eq!(engine.selection(), &["a".into(), "b".into()]);
}

#[test]
fn clicking_empty_canvas_clears_selection() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = RecordingPanel { calls: Vec::new() };

    engine.set_selection(vec!["a".into()]);
    engine.pointer_down(&mut store, &mut panel, &view(), 500.0, 500.0, false);
    assert!(engine.selection().is_empty());
    assert_eq!(panel.calls.last().unwrap().0, None);
}

// --- dragging ------------------------------------------------------------

#[test]
fn drag_moves_element_by_converted_pixels() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 65.0);
    // 45px at the default zoom is exactly 1000ms.
    assert_eq!(store.timeline().get(&"a".into()).unwrap().start_time, 1000);
    engine.pointer_up(&mut store);
}

#[test]
fn drag_is_relative_to_captured_origin_not_cumulative() {
    let mut store = store_with(vec![("a", image(1, 5000, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    // Bar starts at 225px.
    engine.pointer_down(&mut store, &mut panel, &view(), 240.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 285.0);
    engine.pointer_move(&mut store, &view(), 240.0);
    // Returning to the press position restores the original start.
    assert_eq!(store.timeline().get(&"a".into()).unwrap().start_time, 5000);
}

#[test]
fn single_drag_snaps_to_neighbor_edge() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 2000, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    // B's bar spans 90..135px in row 1. Drag it left so its start edge
    // lands within 10px of A's end edge at 45px.
    engine.pointer_down(&mut store, &mut panel, &view(), 100.0, 110.0, false);
    engine.pointer_move(&mut store, &view(), 58.0);
    let b = store.timeline().get(&"b".into()).unwrap();
    assert_eq!(b.start_time, 1000);
}

#[test]
fn multi_selection_drag_skips_snapping() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 2000, 1000)),
        ("c", image(3, 2000, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.set_selection(vec!["b".into(), "c".into()]);
    // Grab B's bar body; multi-selection move must not magnetize.
    engine.pointer_down(&mut store, &mut panel, &view(), 100.0, 110.0, false);
    engine.pointer_move(&mut store, &view(), 58.0);
    let b = store.timeline().get(&"b".into()).unwrap();
    let c = store.timeline().get(&"c".into()).unwrap();
    // 42px left of the press point is 933ms at the default zoom.
    assert_eq!(b.start_time, 2000 - 933);
    assert_eq!(c.start_time, 2000 - 933);
}

#[test]
fn completed_drag_checkpoints_for_undo() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 65.0);
    engine.pointer_up(&mut store);
    assert_eq!(store.timeline().get(&"a".into()).unwrap().start_time, 1000);

    assert!(engine.undo(&mut store));
    assert_eq!(store.timeline().get(&"a".into()).unwrap().start_time, 0);
    assert!(engine.redo(&mut store));
    assert_eq!(store.timeline().get(&"a".into()).unwrap().start_time, 1000);
}

#[test]
fn click_without_movement_does_not_checkpoint() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let before = store.history_len();
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 20.0, 50.0, false);
    engine.pointer_up(&mut store);
    assert_eq!(store.history_len(), before);
}

// --- stretching ----------------------------------------------------------

#[test]
fn static_end_stretch_grows_duration() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 44.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 89.0);
    let a = store.timeline().get(&"a".into()).unwrap();
    assert_eq!(a.start_time, 0);
    assert_eq!(a.duration, 2000);
}

#[test]
fn static_end_stretch_refuses_below_floor() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 44.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), -1.0);
    assert_eq!(store.timeline().get(&"a".into()).unwrap().duration, 1000);
}

#[test]
fn static_start_stretch_shifts_and_shrinks() {
    let mut store = store_with(vec![("a", image(1, 0, 2000))]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 2.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 47.0);
    let a = store.timeline().get(&"a".into()).unwrap();
    assert_eq!(a.start_time, 1000);
    assert_eq!(a.duration, 1000);
}

#[test]
fn dynamic_start_stretch_trims_in_and_keeps_start() {
    let mut store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 500, end: 3000 }, 1.0),
    )]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 23.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 32.0);
    let v = store.timeline().get(&"v".into()).unwrap();
    assert_eq!(v.start_time, 0);
    let trim = v.trim().unwrap();
    assert_eq!(trim.start, 700);
    assert_eq!(trim.end, 3000);
    assert!(0 <= trim.start && trim.start <= trim.end);
}

#[test]
fn dynamic_start_stretch_refuses_negative_trim() {
    let mut store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 500, end: 3000 }, 1.0),
    )]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    engine.pointer_down(&mut store, &mut panel, &view(), 23.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), -22.0);
    assert_eq!(store.timeline().get(&"v".into()).unwrap().trim().unwrap().start, 500);
}

#[test]
fn dynamic_end_stretch_respects_source_length() {
    let mut store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 0, end: 3000 }, 1.0),
    )]);
    let mut engine = InteractionEngine::new();
    let mut panel = NoopOptionsPanel;

    // Shrinking in is fine.
    engine.pointer_down(&mut store, &mut panel, &view(), 135.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 90.0);
    assert_eq!(store.timeline().get(&"v".into()).unwrap().trim().unwrap().end, 2000);
    engine.pointer_up(&mut store);

    // Growing past duration/speed is refused.
    engine.pointer_down(&mut store, &mut panel, &view(), 90.0, 50.0, false);
    engine.pointer_move(&mut store, &view(), 200.0);
    assert_eq!(store.timeline().get(&"v".into()).unwrap().trim().unwrap().end, 2000);
}

// --- commands ------------------------------------------------------------

#[test]
fn split_static_conserves_total_duration() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    store.set_cursor(400);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.split_at_cursor(&mut store);

    assert_eq!(store.timeline().len(), 2);
    let original = store.timeline().get(&"a".into()).unwrap();
    assert_eq!(original.duration, 400);
    let (clone_id, clone) = store
        .timeline()
        .iter()
        .find(|(id, _)| id.as_str() != "a")
        .map(|(id, e)| (id.clone(), e.clone()))
        .unwrap();
    assert_eq!(clone.start_time, 400);
    assert_eq!(clone.duration, 600);
    assert_eq!(clone.priority, 2);
    assert_ne!(clone_id.as_str(), "a");
}

#[test]
fn split_dynamic_partitions_trim_window() {
    let mut store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 0, end: 4000 }, 1.0),
    )]);
    store.set_cursor(1500);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["v".into()]);
    engine.split_at_cursor(&mut store);

    assert_eq!(store.timeline().len(), 2);
    let original = store.timeline().get(&"v".into()).unwrap();
    assert_eq!(original.trim().unwrap(), Trim { start: 0, end: 1500 });
    let clone = store
        .timeline()
        .iter()
        .find(|(id, _)| id.as_str() != "v")
        .map(|(_, e)| e.clone())
        .unwrap();
    assert_eq!(clone.trim().unwrap(), Trim { start: 1500, end: 4000 });
    assert_eq!(clone.start_time, 0);
}

#[test]
fn split_outside_span_is_a_no_op() {
    let mut store = store_with(vec![("a", image(1, 1000, 1000))]);
    store.set_cursor(100);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.split_at_cursor(&mut store);
    assert_eq!(store.timeline().len(), 1);
    assert_eq!(store.timeline().get(&"a".into()).unwrap().duration, 1000);
}

#[test]
fn split_requires_single_selection() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
    ]);
    store.set_cursor(500);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into(), "b".into()]);
    engine.split_at_cursor(&mut store);
    assert_eq!(store.timeline().len(), 2);
}

#[test]
fn copy_paste_inserts_on_top() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(4, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.copy_selected(&mut store);
    engine.paste(&mut store);

    assert_eq!(store.timeline().len(), 3);
    let pasted = store
        .timeline()
        .iter()
        .find(|(id, _)| id.as_str() != "a" && id.as_str() != "b")
        .map(|(_, e)| e.clone())
        .unwrap();
    assert_eq!(pasted.priority, 5);
    assert_eq!(pasted.duration, 1000);
}

#[test]
fn cut_then_paste_restores_content() {
    let mut store = store_with(vec![("a", image(1, 300, 1000))]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.cut_selected(&mut store);
    assert!(store.timeline().is_empty());

    engine.paste(&mut store);
    assert_eq!(store.timeline().len(), 1);
    let (_, restored) = store.timeline().iter().next().map(|(i, e)| (i.clone(), e.clone())).unwrap();
    assert_eq!(restored.start_time, 300);
    assert_eq!(restored.priority, 1);
}

#[test]
fn duplicate_clones_on_top_without_clipboard() {
    let mut store = store_with(vec![
        ("a", image(1, 200, 1000)),
        ("b", image(3, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.duplicate_selected(&mut store);

    assert_eq!(store.timeline().len(), 3);
    let dup = store
        .timeline()
        .iter()
        .find(|(id, _)| id.as_str() != "a" && id.as_str() != "b")
        .map(|(_, e)| e.clone())
        .unwrap();
    assert_eq!(dup.priority, 4);
    assert_eq!(dup.start_time, 200);

    // the clipboard stays empty, so paste has nothing to insert
    engine.paste(&mut store);
    assert_eq!(store.timeline().len(), 3);
}

#[test]
fn copy_requires_single_selection() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into(), "b".into()]);
    engine.copy_selected(&mut store);
    engine.paste(&mut store);
    assert_eq!(store.timeline().len(), 2);
}

#[test]
fn delete_skips_elements_with_children() {
    let mut store = store_with(vec![(
        "v",
        video(1, 0, 4000, Trim { start: 0, end: 4000 }, 1.0),
    )]);
    store.add_element("cap".into(), caption(2, 0, TextParent::Element("v".into())));
    let mut engine = InteractionEngine::new();

    engine.set_selection(vec!["v".into()]);
    engine.delete_selected(&mut store);
    assert!(store.timeline().get(&"v".into()).is_some());

    // Removing the child first unblocks the parent.
    engine.set_selection(vec!["cap".into()]);
    engine.delete_selected(&mut store);
    engine.set_selection(vec!["v".into()]);
    engine.delete_selected(&mut store);
    assert!(store.timeline().is_empty());
}

#[test]
fn delete_checkpoints_and_undoes() {
    let mut store = store_with(vec![("a", image(1, 0, 1000))]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["a".into()]);
    engine.delete_selected(&mut store);
    assert!(store.timeline().is_empty());
    assert!(engine.selection().is_empty());

    assert!(engine.undo(&mut store));
    assert_eq!(store.timeline().len(), 1);
}

#[test]
fn exchange_priority_swaps_with_sorted_neighbor() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
        ("c", image(3, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["b".into()]);
    engine.exchange_priority(&mut store, 1);

    assert_eq!(store.timeline().get(&"b".into()).unwrap().priority, 3);
    assert_eq!(store.timeline().get(&"c".into()).unwrap().priority, 2);

    engine.exchange_priority(&mut store, -1);
    assert_eq!(store.timeline().get(&"b".into()).unwrap().priority, 2);
}

#[test]
fn exchange_priority_at_the_edge_is_a_no_op() {
    let mut store = store_with(vec![
        ("a", image(1, 0, 1000)),
        ("b", image(2, 0, 1000)),
    ]);
    let mut engine = InteractionEngine::new();
    engine.set_selection(vec!["b".into()]);
    engine.exchange_priority(&mut store, 1);
    assert_eq!(store.timeline().get(&"b".into()).unwrap().priority, 2);
}
