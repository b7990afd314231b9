//! Raster-based object picking.
//!
//! Instead of per-shape distance formulas, the engine keeps an off-screen
//! raster mirroring the visible scene in which every object is painted in
//! a color that encodes its id. Answering "what is under this pixel" is a
//! single pixel read plus a map lookup, and occlusion comes for free from
//! paint order. The raster must be rebuilt after every scene mutation and
//! before the next query.

use std::collections::{HashMap, HashSet};

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use uuid::Uuid;

use plotboard_core::constants::{COLOR_RETRY_LIMIT, MIN_PICK_STROKE, POINT_PICK_MARGIN};

use crate::font_manager;
use crate::model::{ObjectShape, PlotObject};
use crate::renderer::to_skia_path;
use crate::scene::Scene;
use crate::transform::CoordinateTransform;

/// An RGB triple identifying one live object in the picking raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

/// Colors no object may be assigned: the raster is cleared to the surface
/// gray, and black/white/grid-gray appear as chrome on the visible
/// surface.
pub const BACKGROUND_SENTINELS: [ColorKey; 4] = [
    ColorKey::new(0, 0, 0),
    ColorKey::new(255, 255, 255),
    ColorKey::new(240, 240, 240),
    ColorKey::new(221, 221, 221),
];

/// The surface background gray (also the raster clear color).
pub const SURFACE_GRAY: ColorKey = ColorKey::new(240, 240, 240);

/// The grid line gray.
pub const GRID_GRAY: ColorKey = ColorKey::new(221, 221, 221);

/// Checks whether a color is one of the reserved background sentinels.
pub fn is_background(color: ColorKey) -> bool {
    BACKGROUND_SENTINELS.contains(&color)
}

// Distinct odd mixing constants, one per channel.
const CHANNEL_MULTIPLIERS: [u32; 3] = [0x0100_0193, 0x85EB_CA6B, 0xC2B2_AE35];

fn hash_channel(key: &str, multiplier: u32, salt: u32) -> u8 {
    let mut acc = salt.wrapping_mul(0x9E37_79B9).wrapping_add(multiplier);
    for byte in key.bytes() {
        acc = acc.wrapping_mul(multiplier).wrapping_add(byte as u32);
    }
    ((acc >> 13) ^ acc) as u8
}

/// Pushes a channel out of the ambiguous mid band so assigned colors stay
/// visually far from each other and from the grays.
fn contrast_push(c: u8) -> u8 {
    if (85..=170).contains(&c) {
        if c < 128 {
            c - 85
        } else {
            c + 85
        }
    } else {
        c
    }
}

fn hash_color(key: &str, salt: u32) -> ColorKey {
    ColorKey::new(
        contrast_push(hash_channel(key, CHANNEL_MULTIPLIERS[0], salt)),
        contrast_push(hash_channel(key, CHANNEL_MULTIPLIERS[1], salt)),
        contrast_push(hash_channel(key, CHANNEL_MULTIPLIERS[2], salt)),
    )
}

/// Off-screen color-indexed raster plus the id/color registry.
pub struct PickingEngine {
    pixmap: Pixmap,
    id_to_color: HashMap<Uuid, ColorKey>,
    color_to_id: HashMap<ColorKey, Uuid>,
    sequential: u32,
}

impl PickingEngine {
    /// Creates an engine for the given surface size.
    pub fn new(width: u32, height: u32) -> Self {
        let pixmap = Pixmap::new(width.max(1), height.max(1))
            .or_else(|| Pixmap::new(1, 1))
            .expect("a 1x1 pixmap is always allocatable");
        Self {
            pixmap,
            id_to_color: HashMap::new(),
            color_to_id: HashMap::new(),
            sequential: 0,
        }
    }

    /// Resizes the raster. Contents are stale until the next rebuild.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(pixmap) = Pixmap::new(width.max(1), height.max(1)) {
            self.pixmap = pixmap;
        }
    }

    /// Returns the color assigned to an id, assigning one on first use.
    ///
    /// The id string is hashed per channel and contrast-pushed; collisions
    /// with assigned colors or background sentinels retry with an
    /// incremented salt. Past the retry ceiling a sequential counter is
    /// encoded directly into the channel bytes, which cannot collide.
    /// The mapping is cached both ways for the object's lifetime.
    pub fn color_for(&mut self, id: Uuid) -> ColorKey {
        if let Some(color) = self.id_to_color.get(&id) {
            return *color;
        }

        let key = id.to_string();
        for salt in 0..COLOR_RETRY_LIMIT {
            let color = hash_color(&key, salt);
            if !is_background(color) && !self.color_to_id.contains_key(&color) {
                self.id_to_color.insert(id, color);
                self.color_to_id.insert(color, id);
                return color;
            }
        }

        tracing::debug!(%id, "hash attempts exhausted, using sequential color");
        loop {
            self.sequential = self.sequential.wrapping_add(1);
            let n = self.sequential;
            let color = ColorKey::new((n >> 16) as u8, (n >> 8) as u8, n as u8);
            if !is_background(color) && !self.color_to_id.contains_key(&color) {
                self.id_to_color.insert(id, color);
                self.color_to_id.insert(color, id);
                return color;
            }
        }
    }

    /// Repaints the raster from the scene.
    ///
    /// Two passes, both in paint order. Pass 1 fills an inflated hit
    /// region per object so thin strokes and small markers are easy to
    /// acquire; pass 2 redraws each object's true shape on top so the
    /// topmost visible object wins at overlaps. Areas skip pass 2: their
    /// pass-1 rectangle already covers them exactly.
    ///
    /// Everything is drawn without anti-aliasing; a blended pixel would
    /// resolve to no id.
    pub fn rebuild(&mut self, scene: &Scene, transform: &CoordinateTransform) {
        self.pixmap.fill(SURFACE_GRAY.to_color());

        let live: HashSet<Uuid> = scene.iter().map(|o| o.id).collect();
        self.id_to_color.retain(|id, _| live.contains(id));
        self.color_to_id.retain(|_, id| live.contains(id));

        let order = scene.paint_order();
        for object in &order {
            let color = self.color_for(object.id);
            self.draw_hit_region(object, color, transform);
        }
        for object in &order {
            if matches!(object.shape, ObjectShape::Area(_)) {
                continue;
            }
            let color = self.color_for(object.id);
            self.draw_true_shape(object, color, transform);
        }
    }

    /// Resolves the object under a device pixel.
    ///
    /// Background sentinels resolve to `None`. So does a color with no
    /// registered id, which only happens when the raster was not rebuilt
    /// after the last mutation; that is logged rather than fatal.
    pub fn query(&self, device_x: f64, device_y: f64) -> Option<Uuid> {
        if !device_x.is_finite() || !device_y.is_finite() {
            return None;
        }
        if device_x < 0.0 || device_y < 0.0 {
            return None;
        }
        let (x, y) = (device_x as u32, device_y as u32);
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }

        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        let color = ColorKey::new(pixel.red(), pixel.green(), pixel.blue());
        if is_background(color) {
            return None;
        }
        match self.color_to_id.get(&color) {
            Some(id) => Some(*id),
            None => {
                tracing::warn!(
                    r = color.r,
                    g = color.g,
                    b = color.b,
                    "picking raster holds an unregistered color; was rebuild skipped?"
                );
                None
            }
        }
    }

    fn paint(color: ColorKey) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_color());
        paint.anti_alias = false;
        paint
    }

    fn fill(&mut self, path: &tiny_skia::Path, color: ColorKey) {
        self.pixmap.fill_path(
            path,
            &Self::paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn stroke(&mut self, path: &tiny_skia::Path, color: ColorKey, width: f64) {
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            path,
            &Self::paint(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Fills a quadrilateral given by four device-space corners.
    fn fill_quad(&mut self, corners: [(f64, f64); 4], color: ColorKey) {
        if corners
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(corners[0].0 as f32, corners[0].1 as f32);
        pb.line_to(corners[1].0 as f32, corners[1].1 as f32);
        pb.line_to(corners[2].0 as f32, corners[2].1 as f32);
        pb.line_to(corners[3].0 as f32, corners[3].1 as f32);
        pb.close();
        if let Some(path) = pb.finish() {
            self.fill(&path, color);
        }
    }

    /// A thick quadrilateral straddling the segment from `a` to `b`,
    /// built from the perpendicular unit vector scaled to at least the
    /// minimum pickable half-width.
    fn segment_quad(a: (f64, f64), b: (f64, f64), half_width: f64) -> Option<[(f64, f64); 4]> {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len < f64::EPSILON {
            return None;
        }
        let nx = -dy / len * half_width;
        let ny = dx / len * half_width;
        Some([
            (a.0 + nx, a.1 + ny),
            (b.0 + nx, b.1 + ny),
            (b.0 - nx, b.1 - ny),
            (a.0 - nx, a.1 - ny),
        ])
    }

    fn draw_hit_region(
        &mut self,
        object: &PlotObject,
        color: ColorKey,
        transform: &CoordinateTransform,
    ) {
        match &object.shape {
            ObjectShape::Point(p) => {
                let (cx, cy) = transform.to_device(p.x, p.y);
                if !cx.is_finite() || !cy.is_finite() {
                    return;
                }
                let radius = (p.size + POINT_PICK_MARGIN) as f32;
                if let Some(path) = PathBuilder::from_circle(cx as f32, cy as f32, radius) {
                    self.fill(&path, color);
                }
            }
            ObjectShape::Line(l) => {
                let a = transform.to_device_point(&l.start);
                let b = transform.to_device_point(&l.end);
                let half_width = l.width.max(MIN_PICK_STROKE) / 2.0;
                if let Some(quad) = Self::segment_quad(a, b, half_width) {
                    self.fill_quad(quad, color);
                }
            }
            ObjectShape::Area(a) => {
                let c0 = transform.to_device_point(&a.start);
                let c1 = transform.to_device_point(&a.end);
                let rect = tiny_skia::Rect::from_ltrb(
                    c0.0.min(c1.0) as f32,
                    c0.1.min(c1.1) as f32,
                    c0.0.max(c1.0) as f32,
                    c0.1.max(c1.1) as f32,
                );
                if let Some(rect) = rect {
                    let path = PathBuilder::from_rect(rect);
                    self.fill(&path, color);
                }
            }
            ObjectShape::Text(t) => {
                let anchor = transform.to_device(t.x, t.y);
                let (w, h) = font_manager::measure_text(&t.text, t.font_size);
                let angle = (-t.rotation).to_radians();
                let (sin_a, cos_a) = angle.sin_cos();
                // Rectangle above the baseline, rotated about the anchor.
                let rotate = |lx: f64, ly: f64| {
                    (
                        anchor.0 + lx * cos_a - ly * sin_a,
                        anchor.1 + lx * sin_a + ly * cos_a,
                    )
                };
                self.fill_quad(
                    [
                        rotate(0.0, 0.0),
                        rotate(w, 0.0),
                        rotate(w, -h),
                        rotate(0.0, -h),
                    ],
                    color,
                );
            }
            ObjectShape::Brace(b) => {
                let a = transform.to_device_point(&b.start);
                let z = transform.to_device_point(&b.end);
                let half_width = b.elevation.abs().max(MIN_PICK_STROKE);
                if let Some(quad) = Self::segment_quad(a, z, half_width) {
                    self.fill_quad(quad, color);
                }
            }
            ObjectShape::Function(f) => {
                if let Some(path) = polyline_path(&f.samples, transform) {
                    self.stroke(&path, color, f.width.max(MIN_PICK_STROKE));
                }
            }
        }
    }

    fn draw_true_shape(
        &mut self,
        object: &PlotObject,
        color: ColorKey,
        transform: &CoordinateTransform,
    ) {
        match &object.shape {
            ObjectShape::Point(p) => {
                let (cx, cy) = transform.to_device(p.x, p.y);
                if !cx.is_finite() || !cy.is_finite() {
                    return;
                }
                if let Some(path) =
                    PathBuilder::from_circle(cx as f32, cy as f32, p.size.max(1.0) as f32)
                {
                    self.fill(&path, color);
                }
            }
            ObjectShape::Line(l) => {
                let a = transform.to_device_point(&l.start);
                let b = transform.to_device_point(&l.end);
                if [a.0, a.1, b.0, b.1].iter().any(|v| !v.is_finite()) {
                    return;
                }
                let mut pb = PathBuilder::new();
                pb.move_to(a.0 as f32, a.1 as f32);
                pb.line_to(b.0 as f32, b.1 as f32);
                if let Some(path) = pb.finish() {
                    self.stroke(&path, color, l.width.max(1.0));
                }
            }
            ObjectShape::Area(_) => {}
            ObjectShape::Text(t) => {
                let anchor = transform.to_device(t.x, t.y);
                font_manager::draw_text(
                    &mut self.pixmap,
                    &t.text,
                    t.font_size,
                    anchor,
                    t.rotation,
                    (color.r, color.g, color.b),
                    0.5,
                );
            }
            ObjectShape::Brace(b) => {
                if let Some(path) = b.device_path(transform).as_ref().and_then(to_skia_path) {
                    self.stroke(&path, color, b.width.max(1.0));
                }
            }
            ObjectShape::Function(f) => {
                if let Some(path) = polyline_path(&f.samples, transform) {
                    self.stroke(&path, color, f.width.max(1.0));
                }
            }
        }
    }
}

/// Builds a device-space polyline path through plot-space sample points.
/// Returns `None` for fewer than two finite points.
pub(crate) fn polyline_path(
    samples: &[crate::model::Point],
    transform: &CoordinateTransform,
) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut started = false;
    for p in samples {
        let (dx, dy) = transform.to_device_point(p);
        if !dx.is_finite() || !dy.is_finite() {
            continue;
        }
        if started {
            pb.line_to(dx as f32, dy as f32);
        } else {
            pb.move_to(dx as f32, dy as f32);
            started = true;
        }
    }
    pb.finish()
}
