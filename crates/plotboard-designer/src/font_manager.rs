//! Font lookup and text rasterization.
//!
//! Text is measured and rasterized with `rusttype` against a system font
//! located through `fontdb`. Systems without any usable sans-serif font
//! fall back to approximate metrics so text objects stay measurable and
//! pickable even when no glyphs can be drawn.

use std::{fs, sync::OnceLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, Scale};
use tiny_skia::Pixmap;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// The default label font, resolved once from the system database.
pub fn default_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(load_system_font).as_ref()
}

fn load_system_font() -> Option<Font<'static>> {
    let families = [Family::SansSerif, Family::Serif, Family::Monospace];
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

/// Measures a string at the given size, returning (width, height) in
/// pixels. Uses real font metrics when a font is available, otherwise a
/// fixed-advance approximation.
pub fn measure_text(text: &str, font_size: f64) -> (f64, f64) {
    if let Some(font) = default_font() {
        let scale = Scale::uniform(font_size as f32);
        let v = font.v_metrics(scale);
        let width: f32 = font
            .layout(text, scale, rt_point(0.0, 0.0))
            .map(|g| g.unpositioned().h_metrics().advance_width)
            .sum();
        (width as f64, (v.ascent - v.descent) as f64)
    } else {
        (text.chars().count() as f64 * font_size * 0.6, font_size)
    }
}

/// Rasterizes a string into the pixmap with the baseline start at
/// `anchor`, rotated `rotation_deg` counter-clockwise in plot orientation
/// (clockwise in device space, since device Y points down).
///
/// Coverage is thresholded instead of blended so every written pixel is
/// the exact requested color; the picking raster depends on that.
pub fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    font_size: f64,
    anchor: (f64, f64),
    rotation_deg: f64,
    color: (u8, u8, u8),
    threshold: f32,
) {
    let Some(font) = default_font() else {
        return;
    };
    if !anchor.0.is_finite() || !anchor.1.is_finite() {
        return;
    }

    let scale = Scale::uniform(font_size as f32);
    let angle = (-rotation_deg).to_radians();
    let (sin_a, cos_a) = angle.sin_cos();
    let width = pixmap.width();
    let height = pixmap.height();

    for glyph in font.layout(text, scale, rt_point(0.0, 0.0)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            if v < threshold {
                return;
            }
            // Offset from the baseline origin, rotated about the anchor.
            let lx = (bb.min.x + gx as i32) as f64;
            let ly = (bb.min.y + gy as i32) as f64;
            let px = anchor.0 + lx * cos_a - ly * sin_a;
            let py = anchor.1 + lx * sin_a + ly * cos_a;
            let (px, py) = (px.round() as i64, py.round() as i64);
            if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                return;
            }
            let idx = ((py as u32 * width + px as u32) * 4) as usize;
            let data = pixmap.data_mut();
            data[idx] = color.0;
            data[idx + 1] = color.1;
            data[idx + 2] = color.2;
            data[idx + 3] = 255;
        });
    }
}
