//! Surface renderer for diagram scenes.
//!
//! Renders the scene to an image buffer for display in the UI using
//! tiny-skia. Objects are painted in z order over an optional grid and the
//! axis lines; the selected object gets a highlight box with corner
//! handles. Path construction is shared with the picking engine so the
//! visible scene and the picking raster cannot drift apart.

use image::{Rgb as ImageRgb, RgbImage};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use plotboard_core::Rgb;

use crate::font_manager;
use crate::model::ObjectShape;
use crate::picking::{polyline_path, GRID_GRAY, SURFACE_GRAY};
use crate::scene::Scene;
use crate::transform::{AxesView, CoordinateTransform};

const HANDLE_SIZE: f32 = 6.0;

fn axis_color() -> Color {
    Color::from_rgba8(120, 120, 120, 255)
}
fn selection_color() -> Color {
    Color::from_rgba8(255, 193, 7, 255)
}

fn style_color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

/// Converts a lyon path into a tiny-skia path.
pub(crate) fn to_skia_path(path: &lyon::path::Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            lyon::path::Event::Begin { at } => {
                pb.move_to(at.x, at.y);
            }
            lyon::path::Event::Line { from: _, to } => {
                pb.line_to(to.x, to.y);
            }
            lyon::path::Event::Quadratic { from: _, ctrl, to } => {
                pb.quad_to(ctrl.x, ctrl.y, to.x, to.y);
            }
            lyon::path::Event::Cubic {
                from: _,
                ctrl1,
                ctrl2,
                to,
            } => {
                pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y);
            }
            lyon::path::Event::End {
                last: _,
                first: _,
                close,
            } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

/// Picks a grid step in plot units so lines land at least ~30 px apart.
fn grid_step(pixels_per_unit: f64) -> Option<f64> {
    if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
        return None;
    }
    const CANDIDATES: [f64; 10] = [0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0];
    CANDIDATES.iter().copied().find(|s| s * pixels_per_unit >= 30.0)
}

/// Renders the scene to an RGB image at the transform's surface size.
pub fn render_scene(scene: &Scene, transform: &CoordinateTransform, axes: &AxesView) -> RgbImage {
    let width = transform.surface_width().max(1.0) as u32;
    let height = transform.surface_height().max(1.0) as u32;
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return RgbImage::new(width.max(1), height.max(1));
    };
    pixmap.fill(Color::from_rgba8(SURFACE_GRAY.r, SURFACE_GRAY.g, SURFACE_GRAY.b, 255));

    if axes.show_grid {
        draw_grid(&mut pixmap, transform);
    }
    draw_axes(&mut pixmap, transform, axes);

    for object in scene.paint_order() {
        draw_object(&mut pixmap, &object.shape, transform);
    }

    if let Some(id) = scene.selected_id() {
        if let Some(object) = scene.get(id) {
            draw_selection(&mut pixmap, object.bounds(), transform);
        }
    }

    let data = pixmap.data();
    RgbImage::from_fn(width, height, |x, y| {
        let idx = ((y * width + x) * 4) as usize;
        ImageRgb([data[idx], data[idx + 1], data[idx + 2]])
    })
}

fn draw_grid(pixmap: &mut Pixmap, transform: &CoordinateTransform) {
    let bounds = transform.bounds();
    let (ppu_x, ppu_y) = transform.device_per_unit();

    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(GRID_GRAY.r, GRID_GRAY.g, GRID_GRAY.b, 255));
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 1.0,
        ..Default::default()
    };

    let mut pb = PathBuilder::new();
    if let Some(step) = grid_step(ppu_x) {
        let mut x = (bounds.x_min / step).ceil() * step;
        while x <= bounds.x_max {
            let (dx, dy_bottom) = transform.to_device(x, bounds.y_min);
            let (_, dy_top) = transform.to_device(x, bounds.y_max);
            pb.move_to(dx as f32, dy_top as f32);
            pb.line_to(dx as f32, dy_bottom as f32);
            x += step;
        }
    }
    if let Some(step) = grid_step(ppu_y) {
        let mut y = (bounds.y_min / step).ceil() * step;
        while y <= bounds.y_max {
            let (dx_left, dy) = transform.to_device(bounds.x_min, y);
            let (dx_right, _) = transform.to_device(bounds.x_max, y);
            pb.move_to(dx_left as f32, dy as f32);
            pb.line_to(dx_right as f32, dy as f32);
            y += step;
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn draw_axes(pixmap: &mut Pixmap, transform: &CoordinateTransform, axes: &AxesView) {
    let bounds = transform.bounds();
    let mut paint = Paint::default();
    paint.set_color(axis_color());
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 2.0,
        ..Default::default()
    };

    let mut pb = PathBuilder::new();
    if bounds.y_min <= 0.0 && bounds.y_max >= 0.0 {
        let (x0, y) = transform.to_device(bounds.x_min, 0.0);
        let (x1, _) = transform.to_device(bounds.x_max, 0.0);
        pb.move_to(x0 as f32, y as f32);
        pb.line_to(x1 as f32, y as f32);
    }
    if bounds.x_min <= 0.0 && bounds.x_max >= 0.0 {
        let (x, y0) = transform.to_device(0.0, bounds.y_min);
        let (_, y1) = transform.to_device(0.0, bounds.y_max);
        pb.move_to(x as f32, y0 as f32);
        pb.line_to(x as f32, y1 as f32);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    // Axis labels sit in the padding: x centered underneath, y at the left.
    let (cx, _) = transform.to_device((bounds.x_min + bounds.x_max) / 2.0, 0.0);
    let (_, cy) = transform.to_device(0.0, (bounds.y_min + bounds.y_max) / 2.0);
    let h = transform.surface_height();
    font_manager::draw_text(
        pixmap,
        &axes.x_label,
        14.0,
        (cx, h - 12.0),
        0.0,
        (80, 80, 80),
        0.33,
    );
    font_manager::draw_text(pixmap, &axes.y_label, 14.0, (12.0, cy), 90.0, (80, 80, 80), 0.33);
}

fn draw_object(pixmap: &mut Pixmap, shape: &ObjectShape, transform: &CoordinateTransform) {
    match shape {
        ObjectShape::Point(p) => {
            let (cx, cy) = transform.to_device(p.x, p.y);
            if !cx.is_finite() || !cy.is_finite() {
                return;
            }
            let mut paint = Paint::default();
            paint.set_color(style_color(p.color));
            paint.anti_alias = true;
            if let Some(path) =
                PathBuilder::from_circle(cx as f32, cy as f32, p.size.max(0.5) as f32)
            {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
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
                stroke_path(pixmap, &path, l.color, l.width.max(0.5));
            }
        }
        ObjectShape::Area(a) => {
            let c0 = transform.to_device_point(&a.start);
            let c1 = transform.to_device_point(&a.end);
            let rect = Rect::from_ltrb(
                c0.0.min(c1.0) as f32,
                c0.1.min(c1.1) as f32,
                c0.0.max(c1.0) as f32,
                c0.1.max(c1.1) as f32,
            );
            if let Some(rect) = rect {
                let path = PathBuilder::from_rect(rect);
                let mut paint = Paint::default();
                paint.set_color(style_color(a.fill));
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        ObjectShape::Text(t) => {
            let anchor = transform.to_device(t.x, t.y);
            font_manager::draw_text(
                pixmap,
                &t.text,
                t.font_size,
                anchor,
                t.rotation,
                (t.color.r, t.color.g, t.color.b),
                0.33,
            );
        }
        ObjectShape::Brace(b) => {
            if let Some(path) = b.device_path(transform).as_ref().and_then(to_skia_path) {
                stroke_path(pixmap, &path, b.color, b.width.max(0.5));
            }
        }
        ObjectShape::Function(f) => {
            if let Some(path) = polyline_path(&f.samples, transform) {
                stroke_path(pixmap, &path, f.color, f.width.max(0.5));
            }
        }
    }
}

fn stroke_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, color: Rgb, width: f64) {
    let mut paint = Paint::default();
    paint.set_color(style_color(color));
    paint.anti_alias = true;
    let stroke = Stroke {
        width: width as f32,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
}

fn draw_selection(pixmap: &mut Pixmap, bounds: (f64, f64, f64, f64), transform: &CoordinateTransform) {
    let (min_x, min_y, max_x, max_y) = bounds;
    let a = transform.to_device(min_x, min_y);
    let b = transform.to_device(max_x, max_y);
    if [a.0, a.1, b.0, b.1].iter().any(|v| !v.is_finite()) {
        return;
    }
    // A few pixels of breathing room; degenerate boxes (points, text
    // anchors) still get a visible highlight.
    let left = a.0.min(b.0) - 4.0;
    let top = a.1.min(b.1) - 4.0;
    let right = a.0.max(b.0) + 4.0;
    let bottom = a.1.max(b.1) + 4.0;

    let Some(rect) = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(selection_color());
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 1.0,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

    for (hx, hy) in [
        (left, top),
        (right, top),
        (left, bottom),
        (right, bottom),
    ] {
        let h = Rect::from_xywh(
            hx as f32 - HANDLE_SIZE / 2.0,
            hy as f32 - HANDLE_SIZE / 2.0,
            HANDLE_SIZE,
            HANDLE_SIZE,
        );
        if let Some(h) = h {
            let h_path = PathBuilder::from_rect(h);
            pixmap.fill_path(&h_path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}
