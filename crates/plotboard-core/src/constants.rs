//! Shared constants for the PlotBoard editor.

/// Default width of the raster drawing surface in pixels.
pub const SURFACE_WIDTH: u32 = 800;

/// Default height of the raster drawing surface in pixels.
pub const SURFACE_HEIGHT: u32 = 600;

/// Padding reserved on every edge of the surface before the plot area
/// is fitted, in pixels.
pub const SURFACE_PADDING: f64 = 40.0;

/// Maximum number of commands retained for undo. Older entries are
/// evicted when the limit is exceeded.
pub const HISTORY_LIMIT: usize = 50;

/// Extra pixels added to a point marker's radius when drawing its
/// picking hit region.
pub const POINT_PICK_MARGIN: f64 = 3.0;

/// Minimum width in pixels of the picking hit region for stroked
/// objects, so hairline strokes stay selectable.
pub const MIN_PICK_STROKE: f64 = 6.0;

/// Number of salted hash attempts before the picking color allocator
/// falls back to sequential assignment.
pub const COLOR_RETRY_LIMIT: u32 = 1000;

/// Braces whose endpoints are closer than this many pixels produce no
/// path at all.
pub const MIN_BRACE_SPAN: f64 = 1.5;

/// Default radius of a point marker in pixels.
pub const DEFAULT_POINT_SIZE: f64 = 4.0;

/// Default stroke width for lines, braces, and function traces.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Default font size for text labels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default perpendicular elevation for new braces, in pixels.
pub const DEFAULT_BRACE_ELEVATION: f64 = 12.0;
