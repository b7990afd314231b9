//! # PlotBoard Designer
//!
//! The editor core for PlotBoard: an interactive 2D diagram editor where
//! typed annotation objects live in a continuous plot coordinate space and
//! render onto a fixed-size raster surface.
//!
//! ## Core Components
//!
//! - **Model**: the closed set of object variants - points, lines, filled
//!   areas, text labels, braces, and function traces
//! - **Transform**: bidirectional, aspect-ratio-aware mapping between plot
//!   space and device pixels
//! - **Scene**: the ordered object collection and selection
//! - **Commands**: reversible mutations with a bounded undo/redo history
//! - **Picking**: an off-screen color-indexed raster that answers
//!   "what is under this pixel" without analytic hit-testing
//! - **Renderer**: scene rasterization for display
//! - **Editor**: the state machine wiring it all behind the pointer and
//!   property boundary
//!
//! ## Architecture
//!
//! ```text
//! PlotEditor
//!   ├── Scene (objects + selection)
//!   ├── History (undo/redo commands)
//!   ├── CoordinateTransform (plot <-> device)
//!   ├── PickingEngine (off-screen id raster)
//!   └── Renderer (visible raster)
//! ```
//!
//! Pointer events flow device-to-plot through the transform, become
//! commands against the scene, and every mutation ends with a picking
//! rebuild so the next query is answered from a current raster.

pub mod commands;
pub mod editor;
pub mod font_manager;
pub mod model;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod serialization;
pub mod transform;

pub use commands::{
    AddObject, ClearScene, DeleteObject, History, ModifyProperty, MoveObject, SceneCommand,
};
pub use editor::{PlotEditor, Tool};
pub use model::{
    brace_path, AreaRect, BraceSpan, BraceStyle, FunctionTrace, LineSegment, MoveCoords,
    ObjectKind, ObjectShape, PlotObject, PlotShape, Point, PointMarker, Property, PropertyValue,
    TextLabel,
};
pub use picking::{ColorKey, PickingEngine, BACKGROUND_SENTINELS};
pub use renderer::render_scene;
pub use scene::{Scene, SceneSnapshot};
pub use serialization::{DiagramFile, DiagramMetadata, ObjectData};
pub use transform::{AxesView, CoordinateTransform, PlotBounds};
