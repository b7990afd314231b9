use plotboard_designer::model::{
    AreaRect, BraceSpan, BraceStyle, FunctionTrace, LineSegment, ObjectShape, PlotObject, Point,
    PointMarker, TextLabel,
};
use plotboard_designer::picking::{is_background, ColorKey, PickingEngine, BACKGROUND_SENTINELS};
use plotboard_designer::scene::Scene;
use plotboard_designer::transform::{CoordinateTransform, PlotBounds};
use uuid::Uuid;

fn default_transform() -> CoordinateTransform {
    // 800x600 surface with default square bounds: 26 px per plot unit,
    // plot origin at device (400, 300).
    CoordinateTransform::new(PlotBounds::default(), 800.0, 600.0)
}

fn engine() -> PickingEngine {
    PickingEngine::new(800, 600)
}

#[test]
fn test_color_assignment_is_memoized() {
    let mut engine = engine();
    let id = Uuid::new_v4();
    let first = engine.color_for(id);
    let second = engine.color_for(id);
    assert_eq!(first, second);
}

#[test]
fn test_thousand_objects_get_distinct_non_sentinel_colors() {
    let mut engine = engine();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..1200 {
        let color = engine.color_for(Uuid::new_v4());
        assert!(!is_background(color), "assigned a background sentinel");
        assert!(seen.insert(color), "color assigned twice");
    }
    assert_eq!(seen.len(), 1200);
}

#[test]
fn test_sentinel_list_contains_surface_grays() {
    assert!(is_background(ColorKey::new(0, 0, 0)));
    assert!(is_background(ColorKey::new(255, 255, 255)));
    assert!(is_background(ColorKey::new(240, 240, 240)));
    assert!(is_background(ColorKey::new(221, 221, 221)));
    assert_eq!(BACKGROUND_SENTINELS.len(), 4);
}

#[test]
fn test_empty_scene_queries_to_none() {
    let mut engine = engine();
    let scene = Scene::new();
    engine.rebuild(&scene, &default_transform());
    assert_eq!(engine.query(400.0, 300.0), None);
}

#[test]
fn test_query_out_of_bounds_and_non_finite() {
    let mut engine = engine();
    engine.rebuild(&Scene::new(), &default_transform());
    assert_eq!(engine.query(-5.0, 10.0), None);
    assert_eq!(engine.query(10.0, 4000.0), None);
    assert_eq!(engine.query(f64::NAN, 10.0), None);
    assert_eq!(engine.query(10.0, f64::INFINITY), None);
}

#[test]
fn test_point_marker_is_pickable_with_margin() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let obj = PlotObject::new(ObjectShape::Point(PointMarker::new(0.0, 0.0)));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(id));
    // Inside the inflated radius (size 4 + margin 3).
    assert_eq!(engine.query(405.0, 300.0), Some(id));
    // Well outside.
    assert_eq!(engine.query(430.0, 300.0), None);
}

#[test]
fn test_hairline_stroke_is_still_pickable() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let mut line = LineSegment::new(Point::new(-5.0, 0.0), Point::new(5.0, 0.0));
    line.width = 0.0;
    let obj = PlotObject::new(ObjectShape::Line(line));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(id));
    assert_eq!(engine.query(400.0, 302.0), Some(id));
    assert_eq!(engine.query(400.0, 330.0), None);
}

#[test]
fn test_area_is_pickable_across_its_rectangle() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let obj = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-4.0, -4.0),
        Point::new(4.0, 4.0),
    )));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(id));
    let (dx, dy) = transform.to_device(3.5, -3.5);
    assert_eq!(engine.query(dx, dy), Some(id));
    let (dx, dy) = transform.to_device(5.0, 5.0);
    assert_eq!(engine.query(dx, dy), None);
}

#[test]
fn test_text_is_pickable_near_its_anchor() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let mut label = TextLabel::new("Hello".to_string(), 0.0, 0.0);
    label.font_size = 30.0;
    let obj = PlotObject::new(ObjectShape::Text(label));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    // Just inside the metrics box, right of the anchor and above the
    // baseline.
    assert_eq!(engine.query(404.0, 295.0), Some(id));
    // Far left of the anchor there is nothing.
    assert_eq!(engine.query(300.0, 295.0), None);
}

#[test]
fn test_rotated_text_hit_region_follows_rotation() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let mut label = TextLabel::new("Hello world".to_string(), 0.0, 0.0);
    label.font_size = 30.0;
    label.rotation = 90.0;
    let obj = PlotObject::new(ObjectShape::Text(label));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    // Rotated 90 degrees counter-clockwise the text runs upward from the
    // anchor on the device surface, glyph bodies left of the baseline.
    assert_eq!(engine.query(396.0, 260.0), Some(id));
    // Where the unrotated box would have been.
    assert_eq!(engine.query(470.0, 295.0), None);
}

#[test]
fn test_brace_region_covers_span_and_bulge() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let mut brace = BraceSpan::new(
        Point::new(-5.0, 0.0),
        Point::new(5.0, 0.0),
        BraceStyle::Traditional,
    );
    brace.elevation = 20.0;
    let obj = PlotObject::new(ObjectShape::Brace(brace));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(id));
    assert_eq!(engine.query(400.0, 315.0), Some(id));
    assert_eq!(engine.query(400.0, 360.0), None);
}

#[test]
fn test_function_trace_is_pickable_along_samples() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let samples = (-50..=50)
        .map(|i| {
            let x = i as f64 / 5.0;
            Point::new(x, x / 2.0)
        })
        .collect();
    let obj = PlotObject::new(ObjectShape::Function(FunctionTrace::new(
        "x / 2".to_string(),
        samples,
    )));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(id));
    let (dx, dy) = transform.to_device(4.0, 2.0);
    assert_eq!(engine.query(dx, dy), Some(id));
    assert_eq!(engine.query(200.0, 100.0), None);
}

#[test]
fn test_occlusion_follows_z_order() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let below = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-5.0, -5.0),
        Point::new(5.0, 5.0),
    )))
    .with_z(0);
    let above = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-2.0, -2.0),
        Point::new(8.0, 8.0),
    )))
    .with_z(1);
    let (below_id, above_id) = (below.id, above.id);
    scene.add(below);
    scene.add(above);
    engine.rebuild(&scene, &transform);

    // The overlap belongs to the higher z-index.
    assert_eq!(engine.query(400.0, 300.0), Some(above_id));

    // Swap priorities and rebuild; the other object wins the overlap.
    scene.get_mut(below_id).unwrap().z_index = 2;
    scene.get_mut(above_id).unwrap().z_index = 0;
    engine.rebuild(&scene, &transform);
    assert_eq!(engine.query(400.0, 300.0), Some(below_id));
}

#[test]
fn test_equal_z_breaks_ties_by_insertion_order() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let first = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-5.0, -5.0),
        Point::new(5.0, 5.0),
    )));
    let second = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-5.0, -5.0),
        Point::new(5.0, 5.0),
    )));
    let second_id = second.id;
    scene.add(first);
    scene.add(second);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(second_id));
}

#[test]
fn test_true_shape_beats_inflated_region_of_lower_object() {
    // A small point sits on top of a big area; the point's true shape
    // must win at its center even though the area also covers it.
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let area = PlotObject::new(ObjectShape::Area(AreaRect::new(
        Point::new(-5.0, -5.0),
        Point::new(5.0, 5.0),
    )))
    .with_z(0);
    let point = PlotObject::new(ObjectShape::Point(PointMarker::new(0.0, 0.0))).with_z(1);
    let (area_id, point_id) = (area.id, point.id);
    scene.add(area);
    scene.add(point);
    engine.rebuild(&scene, &transform);

    assert_eq!(engine.query(400.0, 300.0), Some(point_id));
    // Away from the point the area still answers.
    let (dx, dy) = transform.to_device(-4.0, -4.0);
    assert_eq!(engine.query(dx, dy), Some(area_id));
}

#[test]
fn test_colors_are_dropped_when_objects_die() {
    let mut engine = engine();
    let transform = default_transform();
    let mut scene = Scene::new();
    let obj = PlotObject::new(ObjectShape::Point(PointMarker::new(0.0, 0.0)));
    let id = obj.id;
    scene.add(obj);
    engine.rebuild(&scene, &transform);
    assert_eq!(engine.query(400.0, 300.0), Some(id));

    scene.remove(id);
    engine.rebuild(&scene, &transform);
    assert_eq!(engine.query(400.0, 300.0), None);
}
