use lyon::path::{Event, Path};
use plotboard_designer::model::{brace_path, BraceStyle};

/// One path segment with its endpoint tangent directions, taken straight
/// from the control polygon (exact for Bezier endpoints).
#[derive(Debug, Clone, Copy)]
struct Segment {
    end_point: (f64, f64),
    start_dir: (f64, f64),
    end_dir: (f64, f64),
}

fn direction(a: lyon::math::Point, b: lyon::math::Point) -> (f64, f64) {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    assert!(len > 1e-9, "zero-length tangent");
    (dx / len, dy / len)
}

fn segments(path: &Path) -> Vec<Segment> {
    let mut segs = Vec::new();
    for event in path.iter() {
        match event {
            Event::Line { from, to } => segs.push(Segment {
                end_point: (to.x as f64, to.y as f64),
                start_dir: direction(from, to),
                end_dir: direction(from, to),
            }),
            Event::Quadratic { from, ctrl, to } => segs.push(Segment {
                end_point: (to.x as f64, to.y as f64),
                start_dir: direction(from, ctrl),
                end_dir: direction(ctrl, to),
            }),
            Event::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => segs.push(Segment {
                end_point: (to.x as f64, to.y as f64),
                start_dir: direction(from, ctrl1),
                end_dir: direction(ctrl2, to),
            }),
            Event::Begin { .. } | Event::End { .. } => {}
        }
    }
    segs
}

fn angle_between(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dot = (a.0 * b.0 + a.1 * b.1).clamp(-1.0, 1.0);
    dot.acos()
}

fn first_point(path: &Path) -> (f64, f64) {
    for event in path.iter() {
        if let Event::Begin { at } = event {
            return (at.x as f64, at.y as f64);
        }
    }
    panic!("path has no begin event");
}

#[test]
fn test_too_short_span_yields_no_path() {
    assert!(brace_path((50.0, 50.0), (50.8, 50.4), 20.0, false, BraceStyle::Smooth).is_none());
    assert!(brace_path((10.0, 10.0), (10.0, 10.0), 20.0, false, BraceStyle::Traditional).is_none());
    assert!(
        brace_path((0.0, 0.0), (f64::NAN, 0.0), 20.0, false, BraceStyle::Angled).is_none(),
        "non-finite endpoints must not build a path"
    );
}

#[test]
fn test_zero_elevation_degenerates_to_straight_segment() {
    let path = brace_path((0.0, 0.0), (200.0, 0.0), 0.0, false, BraceStyle::Traditional).unwrap();
    let segs = segments(&path);
    assert_eq!(segs.len(), 1);
    assert!((segs[0].end_point.0 - 200.0).abs() < 1e-3);
    assert!((segs[0].end_point.1 - 0.0).abs() < 1e-3);
}

#[test]
fn test_smooth_brace_passes_through_elevated_midpoint() {
    let path = brace_path((0.0, 0.0), (200.0, 0.0), 20.0, false, BraceStyle::Smooth).unwrap();
    let segs = segments(&path);
    assert_eq!(segs.len(), 2);

    // The first quadratic ends exactly at the midpoint, offset by the
    // elevation along the perpendicular.
    assert!((segs[0].end_point.0 - 100.0).abs() < 1e-3);
    assert!((segs[0].end_point.1 - 20.0).abs() < 1e-3);
    // Joined without a kink.
    assert!(angle_between(segs[0].end_dir, segs[1].start_dir) < 5e-3);
    // Ends back on the base line.
    assert!((segs[1].end_point.0 - 200.0).abs() < 1e-3);
    assert!((segs[1].end_point.1 - 0.0).abs() < 1e-3);
}

#[test]
fn test_smooth_brace_mirrored_flips_side() {
    let path = brace_path((0.0, 0.0), (200.0, 0.0), 20.0, true, BraceStyle::Smooth).unwrap();
    let segs = segments(&path);
    assert!((segs[0].end_point.1 + 20.0).abs() < 1e-3);
}

#[test]
fn test_negative_elevation_flips_side() {
    let path = brace_path((0.0, 0.0), (200.0, 0.0), -20.0, false, BraceStyle::Smooth).unwrap();
    let segs = segments(&path);
    assert!((segs[0].end_point.1 + 20.0).abs() < 1e-3);
}

#[test]
fn test_traditional_brace_spans_endpoint_to_endpoint() {
    let path =
        brace_path((0.0, 0.0), (200.0, 0.0), 20.0, false, BraceStyle::Traditional).unwrap();
    let start = first_point(&path);
    assert!((start.0).abs() < 1e-3 && (start.1).abs() < 1e-3);

    let segs = segments(&path);
    assert_eq!(segs.len(), 6);
    let last = segs.last().unwrap().end_point;
    assert!((last.0 - 200.0).abs() < 1e-3 && (last.1).abs() < 1e-3);

    // The central tip reaches the full elevation at the midpoint.
    let tip = segs[2].end_point;
    assert!((tip.0 - 100.0).abs() < 1e-3);
    assert!((tip.1 - 20.0).abs() < 1e-3);
}

#[test]
fn test_traditional_radius_clamps_on_short_spans() {
    // Span 30 with elevation 40 would need radius 20; the quarter-span cap
    // keeps the construction finite and shallow instead.
    let path = brace_path((0.0, 0.0), (30.0, 0.0), 40.0, false, BraceStyle::Traditional).unwrap();
    for seg in segments(&path) {
        assert!(seg.end_point.0.is_finite() && seg.end_point.1.is_finite());
        assert!(seg.end_point.1 <= 15.0 + 1e-3, "tip must stay clamped");
    }
}

#[test]
fn test_angled_brace_junctions_are_tangent_continuous() {
    // The defining property of the 45deg style: the outer-arc/run and
    // run/inner-arc junctions must not kink, for any elevation and span.
    // The central tip is the one intentional corner and is excluded.
    let cases = [
        ((0.0, 0.0), (200.0, 0.0), 20.0),
        ((0.0, 0.0), (200.0, 0.0), 35.0),
        ((0.0, 0.0), (120.0, 0.0), 30.0),
        ((10.0, 20.0), (170.0, 140.0), 25.0),
        ((50.0, 300.0), (400.0, 80.0), 40.0),
    ];
    for (start, end, elevation) in cases {
        let path = brace_path(start, end, elevation, false, BraceStyle::Angled).unwrap();
        let segs = segments(&path);
        assert_eq!(segs.len(), 6, "expected arc/run/arc per half");

        for (i, j) in [(0, 1), (1, 2), (3, 4), (4, 5)] {
            let angle = angle_between(segs[i].end_dir, segs[j].start_dir);
            assert!(
                angle < 5e-3,
                "kink of {angle} rad at junction {i}->{j} for span {start:?}->{end:?} elev {elevation}"
            );
        }
    }
}

#[test]
fn test_angled_brace_leaves_endpoints_at_45_degrees() {
    let path = brace_path((0.0, 0.0), (200.0, 0.0), 20.0, false, BraceStyle::Angled).unwrap();
    let segs = segments(&path);
    let takeoff = segs[0].start_dir;
    // 45 degrees between the takeoff tangent and the span direction.
    assert!((angle_between(takeoff, (1.0, 0.0)) - std::f64::consts::FRAC_PI_4).abs() < 5e-3);
}

#[test]
fn test_angled_brace_clamps_elevation_on_short_spans() {
    let path = brace_path((0.0, 0.0), (10.0, 0.0), 100.0, false, BraceStyle::Angled).unwrap();
    for seg in segments(&path) {
        assert!(seg.end_point.0.is_finite() && seg.end_point.1.is_finite());
        // Clamped elevation is span / (2 * sqrt(2)) ~ 3.54.
        assert!(seg.end_point.1 <= 4.0);
    }
}

#[test]
fn test_diagonal_brace_is_symmetric_about_midpoint() {
    let path = brace_path((0.0, 0.0), (160.0, 120.0), 24.0, false, BraceStyle::Traditional)
        .unwrap();
    let segs = segments(&path);
    let tip = segs[2].end_point;
    // Tip sits at midpoint + elevation along the left perpendicular of
    // the span direction (0.8, 0.6), which is (-0.6, 0.8).
    assert!((tip.0 - (80.0 - 0.6 * 24.0)).abs() < 1e-2);
    assert!((tip.1 - (60.0 + 0.8 * 24.0)).abs() < 1e-2);
}
