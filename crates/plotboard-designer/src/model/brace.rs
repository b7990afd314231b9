//! Brace annotations and their closed-form path construction.
//!
//! A brace spans two endpoints and bulges a fixed number of pixels to one
//! side. The path is built in device space from the transformed endpoints,
//! in a local frame where `t` runs along the span and `e` runs along the
//! perpendicular, then mapped back out. Circular arcs are emitted as cubic
//! Beziers, so the construction survives any affine placement.

use lyon::math::point;
use lyon::path::Path;
use serde::{Deserialize, Serialize};

use plotboard_core::constants::{DEFAULT_BRACE_ELEVATION, DEFAULT_STROKE_WIDTH, MIN_BRACE_SPAN};
use plotboard_core::Rgb;

use super::{PlotShape, Point, Property, PropertyValue};
use crate::transform::CoordinateTransform;

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const FRAC_PI_2: f64 = std::f64::consts::FRAC_PI_2;
const FRAC_PI_4: f64 = std::f64::consts::FRAC_PI_4;
const PI: f64 = std::f64::consts::PI;

/// Rendering style of a brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BraceStyle {
    /// A symmetric double-quadratic curve through the elevated midpoint.
    #[serde(rename = "smooth")]
    Smooth,
    /// The classic curly silhouette: quarter arcs at the ends and into a
    /// pointed central tip, joined by axis-parallel runs.
    #[serde(rename = "traditional")]
    Traditional,
    /// Overlap-free variant that leaves each endpoint at 45 degrees, for
    /// braces meeting at near-perpendicular corners.
    #[serde(rename = "45deg")]
    Angled,
}

impl BraceStyle {
    /// Stable tag used in design files and property edits.
    pub fn tag(&self) -> &'static str {
        match self {
            BraceStyle::Smooth => "smooth",
            BraceStyle::Traditional => "traditional",
            BraceStyle::Angled => "45deg",
        }
    }

    /// Parses a style tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "smooth" => Some(BraceStyle::Smooth),
            "traditional" => Some(BraceStyle::Traditional),
            "45deg" => Some(BraceStyle::Angled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceSpan {
    pub start: Point,
    pub end: Point,
    /// Perpendicular bulge in device pixels.
    pub elevation: f64,
    /// Flips the bulge to the other side of the span.
    pub mirrored: bool,
    pub style: BraceStyle,
    /// Stroke width in device pixels.
    pub width: f64,
    pub color: Rgb,
}

impl BraceSpan {
    pub fn new(start: Point, end: Point, style: BraceStyle) -> Self {
        Self {
            start,
            end,
            elevation: DEFAULT_BRACE_ELEVATION,
            mirrored: false,
            style,
            width: DEFAULT_STROKE_WIDTH,
            color: Rgb::new(40, 40, 40),
        }
    }

    /// Builds the device-space path for this brace under the given
    /// transform. Returns `None` when the projected endpoints are too
    /// close together to construct anything.
    pub fn device_path(&self, transform: &CoordinateTransform) -> Option<Path> {
        let d0 = transform.to_device_point(&self.start);
        let d1 = transform.to_device_point(&self.end);
        brace_path(d0, d1, self.elevation, self.mirrored, self.style)
    }
}

impl PlotShape for BraceSpan {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start.x += dx;
        self.start.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property {
                name: "x1".to_string(),
                value: PropertyValue::Number(self.start.x),
            },
            Property {
                name: "y1".to_string(),
                value: PropertyValue::Number(self.start.y),
            },
            Property {
                name: "x2".to_string(),
                value: PropertyValue::Number(self.end.x),
            },
            Property {
                name: "y2".to_string(),
                value: PropertyValue::Number(self.end.y),
            },
            Property {
                name: "elevation".to_string(),
                value: PropertyValue::Number(self.elevation),
            },
            Property {
                name: "mirrored".to_string(),
                value: PropertyValue::Bool(self.mirrored),
            },
            Property {
                name: "style".to_string(),
                value: PropertyValue::String(self.style.tag().to_string()),
            },
            Property {
                name: "width".to_string(),
                value: PropertyValue::Number(self.width),
            },
            Property {
                name: "color".to_string(),
                value: PropertyValue::String(self.color.to_hex()),
            },
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "x1" => Some(PropertyValue::Number(self.start.x)),
            "y1" => Some(PropertyValue::Number(self.start.y)),
            "x2" => Some(PropertyValue::Number(self.end.x)),
            "y2" => Some(PropertyValue::Number(self.end.y)),
            "elevation" => Some(PropertyValue::Number(self.elevation)),
            "mirrored" => Some(PropertyValue::Bool(self.mirrored)),
            "style" => Some(PropertyValue::String(self.style.tag().to_string())),
            "width" => Some(PropertyValue::Number(self.width)),
            "color" => Some(PropertyValue::String(self.color.to_hex())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match (name, value) {
            ("x1", PropertyValue::Number(v)) => {
                self.start.x = *v;
                true
            }
            ("y1", PropertyValue::Number(v)) => {
                self.start.y = *v;
                true
            }
            ("x2", PropertyValue::Number(v)) => {
                self.end.x = *v;
                true
            }
            ("y2", PropertyValue::Number(v)) => {
                self.end.y = *v;
                true
            }
            ("elevation", PropertyValue::Number(v)) => {
                self.elevation = *v;
                true
            }
            ("mirrored", PropertyValue::Bool(v)) => {
                self.mirrored = *v;
                true
            }
            ("style", PropertyValue::String(s)) => match BraceStyle::from_tag(s) {
                Some(style) => {
                    self.style = style;
                    true
                }
                None => false,
            },
            ("width", PropertyValue::Number(v)) => {
                self.width = *v;
                true
            }
            ("color", PropertyValue::String(s)) => match Rgb::from_hex(s) {
                Some(c) => {
                    self.color = c;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Local brace frame: `t` along the span from the first endpoint, `e`
/// along the perpendicular toward the bulge.
struct LocalFrame {
    origin: (f64, f64),
    u: (f64, f64),
    n: (f64, f64),
}

impl LocalFrame {
    fn point(&self, t: f64, e: f64) -> lyon::math::Point {
        point(
            (self.origin.0 + self.u.0 * t + self.n.0 * e) as f32,
            (self.origin.1 + self.u.1 * t + self.n.1 * e) as f32,
        )
    }
}

/// Emits a circular arc as a single cubic Bezier, in local coordinates.
///
/// The arc runs from angle `a0` to `a1` (radians, signed sweep, at most a
/// quarter turn) around center `(ct, ce)`. The current path position must
/// already be the arc's start point. Control points follow the standard
/// `k = 4/3 * tan(sweep/4) * r` construction, which makes the endpoint
/// tangents exact.
fn arc_cubic(
    builder: &mut lyon::path::path::Builder,
    frame: &LocalFrame,
    ct: f64,
    ce: f64,
    r: f64,
    a0: f64,
    a1: f64,
) {
    let k = (4.0 / 3.0) * ((a1 - a0) / 4.0).tan() * r;
    let (s0, c0) = a0.sin_cos();
    let (s1, c1) = a1.sin_cos();
    let ctrl1 = (ct + r * c0 - k * s0, ce + r * s0 + k * c0);
    let ctrl2 = (ct + r * c1 + k * s1, ce + r * s1 - k * c1);
    let to = (ct + r * c1, ce + r * s1);
    builder.cubic_bezier_to(
        frame.point(ctrl1.0, ctrl1.1),
        frame.point(ctrl2.0, ctrl2.1),
        frame.point(to.0, to.1),
    );
}

/// Constructs a brace path between two device-space endpoints.
///
/// Returns `None` when the endpoints are closer than the minimum span.
/// A near-zero elevation degenerates to a straight segment.
pub fn brace_path(
    start: (f64, f64),
    end: (f64, f64),
    elevation: f64,
    mirrored: bool,
    style: BraceStyle,
) -> Option<Path> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len < MIN_BRACE_SPAN {
        return None;
    }

    let u = (dx / len, dy / len);
    let mut n = (-u.1, u.0);
    let mut rise = if mirrored { -elevation } else { elevation };
    if rise < 0.0 {
        n = (-n.0, -n.1);
        rise = -rise;
    }
    let frame = LocalFrame {
        origin: start,
        u,
        n,
    };

    let mut builder = Path::builder();
    builder.begin(frame.point(0.0, 0.0));

    if rise < 0.5 {
        builder.line_to(frame.point(len, 0.0));
        builder.end(false);
        return Some(builder.build());
    }

    match style {
        BraceStyle::Smooth => {
            // Two quadratics meeting at the elevated midpoint; putting the
            // control points at the elevation height keeps the join C1.
            builder.quadratic_bezier_to(frame.point(0.0, rise), frame.point(len / 2.0, rise));
            builder.quadratic_bezier_to(frame.point(len, rise), frame.point(len, 0.0));
        }
        BraceStyle::Traditional => {
            // Quarter arcs of radius elevation/2; the radius is capped at a
            // quarter of the span so short braces shallow out instead of
            // self-intersecting.
            let r = (rise / 2.0).min(len / 4.0);
            let tip = 2.0 * r;
            builder_traditional(&mut builder, &frame, len, r, tip);
        }
        BraceStyle::Angled => {
            // Outer 45-degree arc of radius inner * sqrt(2). That exact
            // ratio makes the outer arc meet the axis-parallel run with a
            // matching tangent; changing it introduces a kink.
            let e = rise.min(len / (2.0 * SQRT_2));
            let ri = e / SQRT_2;
            let ro = e;
            let run_height = e - ri;
            builder_angled(&mut builder, &frame, len, e, ri, ro, run_height);
        }
    }

    builder.end(false);
    Some(builder.build())
}

fn builder_traditional(
    builder: &mut lyon::path::path::Builder,
    frame: &LocalFrame,
    len: f64,
    r: f64,
    tip: f64,
) {
    arc_cubic(builder, frame, r, 0.0, r, PI, FRAC_PI_2);
    if len / 2.0 - 2.0 * r > 1e-9 {
        builder.line_to(frame.point(len / 2.0 - r, r));
    }
    arc_cubic(builder, frame, len / 2.0 - r, tip, r, -FRAC_PI_2, 0.0);
    arc_cubic(builder, frame, len / 2.0 + r, tip, r, PI, PI + FRAC_PI_2);
    if len / 2.0 - 2.0 * r > 1e-9 {
        builder.line_to(frame.point(len - r, r));
    }
    arc_cubic(builder, frame, len - r, 0.0, r, FRAC_PI_2, 0.0);
}

fn builder_angled(
    builder: &mut lyon::path::path::Builder,
    frame: &LocalFrame,
    len: f64,
    e: f64,
    ri: f64,
    ro: f64,
    run_height: f64,
) {
    arc_cubic(builder, frame, ri, -ri, ro, PI - FRAC_PI_4, FRAC_PI_2);
    if len / 2.0 - 2.0 * ri > 1e-9 {
        builder.line_to(frame.point(len / 2.0 - ri, run_height));
    }
    arc_cubic(builder, frame, len / 2.0 - ri, e, ri, -FRAC_PI_2, 0.0);
    arc_cubic(builder, frame, len / 2.0 + ri, e, ri, PI, PI + FRAC_PI_2);
    if len / 2.0 - 2.0 * ri > 1e-9 {
        builder.line_to(frame.point(len - ri, run_height));
    }
    arc_cubic(builder, frame, len - ri, -ri, ro, FRAC_PI_2, FRAC_PI_4);
}
