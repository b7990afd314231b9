//! Plot bounds and coordinate transformation for surface rendering.
//!
//! Handles conversion between device coordinates (pixels, origin top-left)
//! and plot coordinates (the continuous mathematical space defined by the
//! axis bounds). The mapping is aspect-ratio aware: the plot rectangle is
//! fitted into the padded surface without stretching, centering the unused
//! dimension (letterboxing).

use serde::{Deserialize, Serialize};

use plotboard_core::constants::SURFACE_PADDING;
use plotboard_core::{PlotError, Result};

use crate::model::Point;

/// The plot-space rectangle covered by the axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotBounds {
    /// Creates validated bounds. Each range must be strictly increasing.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        if !(x_min < x_max) {
            return Err(PlotError::InvalidBounds {
                axis: "x",
                min: x_min,
                max: x_max,
            });
        }
        if !(y_min < y_max) {
            return Err(PlotError::InvalidBounds {
                axis: "y",
                min: y_min,
                max: y_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Width of the plot-space rectangle.
    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the plot-space rectangle.
    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Default for PlotBounds {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

/// Axes presentation state: aspect ratio, grid visibility, labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesView {
    /// Scales the effective plot-space width before fitting. Must be
    /// positive; validated at the editor boundary.
    pub aspect_ratio: f64,
    pub show_grid: bool,
    pub x_label: String,
    pub y_label: String,
}

impl Default for AxesView {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            show_grid: true,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
        }
    }
}

/// The fitted drawing frame inside the padded surface. Derived identically
/// by both mapping directions so they stay exact inverses.
#[derive(Debug, Clone, Copy)]
struct FittedFrame {
    width: f64,
    height: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Bidirectional mapping between plot space and device space.
#[derive(Debug, Clone)]
pub struct CoordinateTransform {
    bounds: PlotBounds,
    aspect_ratio: f64,
    surface_width: f64,
    surface_height: f64,
}

impl CoordinateTransform {
    /// Creates a transform for the given bounds and surface size.
    pub fn new(bounds: PlotBounds, surface_width: f64, surface_height: f64) -> Self {
        Self {
            bounds,
            aspect_ratio: 1.0,
            surface_width,
            surface_height,
        }
    }

    /// Gets the current plot bounds.
    pub fn bounds(&self) -> PlotBounds {
        self.bounds
    }

    /// Replaces the plot bounds wholesale.
    pub fn set_bounds(&mut self, bounds: PlotBounds) {
        self.bounds = bounds;
    }

    /// Gets the aspect ratio applied to the plot-space width.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Sets the aspect ratio. Validation happens at the editor boundary.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Gets the surface width in pixels.
    pub fn surface_width(&self) -> f64 {
        self.surface_width
    }

    /// Gets the surface height in pixels.
    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }

    /// Sets the surface dimensions (typically on window resize).
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface_width = width;
        self.surface_height = height;
    }

    /// Derives the fitted frame from the current bounds, aspect ratio, and
    /// surface size. Recomputed on every call; nothing is cached across
    /// bound changes.
    ///
    /// The effective plot aspect `(x_range * aspect_ratio) / y_range` is
    /// compared against the padded surface aspect. The larger one decides
    /// the constraining dimension; the other dimension shrinks and is
    /// centered, so a mismatched aspect ratio letterboxes instead of
    /// stretching.
    fn frame(&self) -> FittedFrame {
        let avail_w = self.surface_width - 2.0 * SURFACE_PADDING;
        let avail_h = self.surface_height - 2.0 * SURFACE_PADDING;

        let plot_aspect = (self.bounds.x_range() * self.aspect_ratio) / self.bounds.y_range();
        let device_aspect = avail_w / avail_h;

        let (width, height) = if plot_aspect > device_aspect {
            (avail_w, avail_w / plot_aspect)
        } else {
            (avail_h * plot_aspect, avail_h)
        };

        FittedFrame {
            width,
            height,
            offset_x: SURFACE_PADDING + (avail_w - width) / 2.0,
            offset_y: SURFACE_PADDING + (avail_h - height) / 2.0,
        }
    }

    /// Converts plot coordinates to device coordinates.
    ///
    /// Device coordinates have (0,0) at the top-left with +Y going down;
    /// plot space has +Y going up, so the Y axis flips.
    ///
    /// Formula:
    /// ```text
    /// device_x = offset_x + (x - x_min) / x_range * frame_width
    /// device_y = offset_y + (y_max - y) / y_range * frame_height
    /// ```
    pub fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
        let f = self.frame();
        let device_x = f.offset_x + (x - self.bounds.x_min) / self.bounds.x_range() * f.width;
        let device_y = f.offset_y + (self.bounds.y_max - y) / self.bounds.y_range() * f.height;
        (device_x, device_y)
    }

    /// Converts plot coordinates to device coordinates (using Point).
    pub fn to_device_point(&self, p: &Point) -> (f64, f64) {
        self.to_device(p.x, p.y)
    }

    /// Converts device coordinates to plot coordinates.
    ///
    /// Exact inverse of [`to_device`](Self::to_device); both derive the
    /// same fitted frame. Degenerate bounds or a zero-sized surface yield
    /// NaN or infinities, which callers treat as "nothing here" rather
    /// than an error.
    pub fn to_plot(&self, device_x: f64, device_y: f64) -> Point {
        let f = self.frame();
        let x = self.bounds.x_min + (device_x - f.offset_x) / f.width * self.bounds.x_range();
        let y = self.bounds.y_max - (device_y - f.offset_y) / f.height * self.bounds.y_range();
        Point::new(x, y)
    }

    /// Device pixels per plot unit along each axis for the current frame.
    pub fn device_per_unit(&self) -> (f64, f64) {
        let f = self.frame();
        (
            f.width / self.bounds.x_range(),
            f.height / self.bounds.y_range(),
        )
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(
            PlotBounds::default(),
            plotboard_core::constants::SURFACE_WIDTH as f64,
            plotboard_core::constants::SURFACE_HEIGHT as f64,
        )
    }
}
