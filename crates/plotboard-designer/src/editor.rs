//! Editor state: the scene, history, transform, and picking raster wired
//! together behind the pointer/property/axes boundary the UI layer calls.
//!
//! Everything is single-threaded and synchronous: each operation runs to
//! completion, and the picking raster is rebuilt before the call returns,
//! so a query always sees the latest scene.
//!
//! Dragging is the one multi-step interaction. The dragged object is
//! mutated live on every pointer move for responsive feedback, bypassing
//! the command engine; pointer release records a single Move command via
//! `record_without_executing`. That asymmetry is deliberate - re-applying
//! the move on record would double it.

use std::path::Path as FsPath;

use uuid::Uuid;

use plotboard_core::constants::{SURFACE_HEIGHT, SURFACE_WIDTH};
use plotboard_core::{PlotError, Result};

use crate::commands::{
    AddObject, ClearScene, DeleteObject, History, ModifyProperty, MoveObject, SceneCommand,
};
use crate::model::{
    AreaRect, BraceSpan, BraceStyle, LineSegment, MoveCoords, ObjectShape, PlotObject, PlotShape,
    Point, PointMarker, PropertyValue, TextLabel,
};
use crate::picking::PickingEngine;
use crate::renderer;
use crate::scene::Scene;
use crate::serialization::DiagramFile;
use crate::transform::{AxesView, CoordinateTransform, PlotBounds};

/// The active pointer tool, as named by the toolbar layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Point,
    Line,
    Area,
    Text,
    Brace,
    Function,
}

impl Tool {
    /// Parses an external tool name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Tool::Select),
            "point" => Some(Tool::Point),
            "line" => Some(Tool::Line),
            "area" => Some(Tool::Area),
            "text" => Some(Tool::Text),
            "brace" => Some(Tool::Brace),
            "function" => Some(Tool::Function),
            _ => None,
        }
    }
}

/// Live drag state between pointer press and release.
#[derive(Debug, Clone)]
struct DragSession {
    id: Uuid,
    /// Anchor coordinates at press time, for the Move command.
    origin: MoveCoords,
    /// Last pointer position in plot space.
    last: Point,
}

/// The diagram editor instance.
pub struct PlotEditor {
    scene: Scene,
    history: History,
    transform: CoordinateTransform,
    axes: AxesView,
    picking: PickingEngine,
    tool: Tool,
    drag: Option<DragSession>,
    pub design_name: String,
    pub is_modified: bool,
}

impl PlotEditor {
    /// Creates an editor with the default surface size.
    pub fn new() -> Self {
        Self::with_surface_size(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    /// Creates an editor with an explicit surface size in pixels.
    pub fn with_surface_size(width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            transform: CoordinateTransform::new(
                PlotBounds::default(),
                width as f64,
                height as f64,
            ),
            axes: AxesView::default(),
            picking: PickingEngine::new(width, height),
            tool: Tool::Select,
            drag: None,
            design_name: "Untitled".to_string(),
            is_modified: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn axes(&self) -> &AxesView {
        &self.axes
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Objects in insertion order, for the list/inspector surface.
    pub fn objects(&self) -> impl Iterator<Item = &PlotObject> {
        self.scene.iter()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.scene.selected_id()
    }

    pub fn selected_object(&self) -> Option<&PlotObject> {
        self.scene.selected_id().and_then(|id| self.scene.get(id))
    }

    /// Selects an object directly (list/inspector path). Passing `None`
    /// clears the selection.
    pub fn select_object(&mut self, id: Option<Uuid>) {
        self.scene.set_selected(id);
        self.drag = None;
    }

    /// Sets the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drag = None;
    }

    /// Sets the active tool from its external name. Unknown names fall
    /// back to select.
    pub fn set_tool_by_name(&mut self, name: &str) {
        match Tool::from_name(name) {
            Some(tool) => self.set_tool(tool),
            None => {
                tracing::warn!(name, "unknown tool name, defaulting to select");
                self.set_tool(Tool::Select);
            }
        }
    }

    /// Replaces the plot bounds. Degenerate ranges are rejected here so
    /// the transform never sees them.
    pub fn set_bounds(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<()> {
        let bounds = PlotBounds::new(x_min, x_max, y_min, y_max)?;
        self.transform.set_bounds(bounds);
        self.rebuild_picking();
        Ok(())
    }

    /// Sets the plot aspect ratio. Must be positive and finite.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) -> Result<()> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(PlotError::InvalidAspectRatio {
                value: aspect_ratio,
            });
        }
        self.axes.aspect_ratio = aspect_ratio;
        self.transform.set_aspect_ratio(aspect_ratio);
        self.rebuild_picking();
        Ok(())
    }

    /// Toggles grid rendering.
    pub fn set_show_grid(&mut self, show: bool) {
        self.axes.show_grid = show;
    }

    /// Sets the axis labels.
    pub fn set_labels(&mut self, x_label: impl Into<String>, y_label: impl Into<String>) {
        self.axes.x_label = x_label.into();
        self.axes.y_label = y_label.into();
    }

    /// Resizes the drawing surface, keeping the raster in sync.
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.transform
            .set_surface_size(width as f64, height as f64);
        self.picking.resize(width, height);
        self.rebuild_picking();
    }

    /// Repaints the picking raster from the current scene. Called
    /// internally after every mutation; exposed for collaborators that
    /// mutate the scene through [`scene_mut`](Self::scene_mut).
    pub fn rebuild_picking(&mut self) {
        self.picking.rebuild(&self.scene, &self.transform);
    }

    /// Mutable scene access for external collaborators. The caller owns
    /// the rebuild-before-query obligation afterwards.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn push_command(&mut self, command: SceneCommand) {
        self.history.execute(command, &mut self.scene);
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        self.is_modified = true;
        self.rebuild_picking();
    }

    /// Adds an object built from a fully-formed variant payload. Returns
    /// its id. The new object becomes the selection.
    pub fn add_object(&mut self, shape: ObjectShape) -> Uuid {
        self.add_plot_object(PlotObject::new(shape))
    }

    /// Adds a pre-built object (caller controls id and z-index).
    pub fn add_plot_object(&mut self, object: PlotObject) -> Uuid {
        let id = object.id;
        self.push_command(SceneCommand::Add(AddObject::new(object)));
        self.scene.set_selected(Some(id));
        id
    }

    /// Deletes the selected object. Returns false when nothing is
    /// selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.scene.selected_id() else {
            return false;
        };
        let label = self
            .scene
            .get(id)
            .map(|o| o.name.clone())
            .unwrap_or_default();
        self.push_command(SceneCommand::Delete(DeleteObject::new(id, label)));
        true
    }

    /// Removes every object, as a single undoable command.
    pub fn clear_all(&mut self) {
        if self.scene.is_empty() {
            return;
        }
        self.push_command(SceneCommand::Clear(ClearScene::new()));
    }

    /// Edits one property of the selected object. Creates no command when
    /// the value is unchanged.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        let id = self.scene.selected_id().ok_or(PlotError::NoSelection)?;
        let Some(object) = self.scene.get(id) else {
            return Err(PlotError::NoSelection);
        };
        let old = object
            .shape
            .property(name)
            .ok_or_else(|| PlotError::UnknownProperty {
                name: name.to_string(),
            })?;
        if old == value {
            return Ok(());
        }
        // Probe a clone first so a type-mismatched or unparsable value is
        // rejected instead of becoming a dead command in history.
        let mut probe = object.shape.clone();
        if !probe.set_property(name, &value) {
            return Err(PlotError::UnknownProperty {
                name: name.to_string(),
            });
        }
        self.push_command(SceneCommand::Modify(ModifyProperty {
            id,
            name: name.to_string(),
            old,
            new: value,
        }));
        Ok(())
    }

    /// Undoes the most recent command.
    pub fn undo(&mut self) -> bool {
        if self.history.undo(&mut self.scene) {
            self.after_mutation();
            true
        } else {
            false
        }
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self) -> bool {
        if self.history.redo(&mut self.scene) {
            self.after_mutation();
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Resolves the object under a device pixel. The raster is always
    /// current here because every mutating path rebuilds it.
    pub fn query(&self, device_x: f64, device_y: f64) -> Option<Uuid> {
        self.picking.query(device_x, device_y)
    }

    /// Pointer press. With the select tool this picks (and possibly
    /// starts dragging) the object under the pointer; drawing tools place
    /// a default-sized object of their kind.
    pub fn pointer_pressed(&mut self, device_x: f64, device_y: f64) {
        match self.tool {
            Tool::Select => {
                let hit = self.picking.query(device_x, device_y);
                self.scene.set_selected(hit);
                self.drag = None;
                if let Some(id) = hit {
                    if let Some(origin) =
                        self.scene.get(id).and_then(|o| o.shape.anchor_coords())
                    {
                        self.drag = Some(DragSession {
                            id,
                            origin,
                            last: self.transform.to_plot(device_x, device_y),
                        });
                    }
                }
            }
            tool => {
                let p = self.transform.to_plot(device_x, device_y);
                if !p.x.is_finite() || !p.y.is_finite() {
                    return;
                }
                let (ppu_x, ppu_y) = self.transform.device_per_unit();
                let shape = match tool {
                    Tool::Point => ObjectShape::Point(PointMarker::new(p.x, p.y)),
                    Tool::Line => ObjectShape::Line(LineSegment::new(
                        p,
                        Point::new(p.x + 60.0 / ppu_x, p.y),
                    )),
                    Tool::Area => ObjectShape::Area(AreaRect::new(
                        p,
                        Point::new(p.x + 60.0 / ppu_x, p.y - 40.0 / ppu_y),
                    )),
                    Tool::Text => ObjectShape::Text(TextLabel::new("Text".to_string(), p.x, p.y)),
                    Tool::Brace => ObjectShape::Brace(BraceSpan::new(
                        p,
                        Point::new(p.x + 80.0 / ppu_x, p.y),
                        BraceStyle::Smooth,
                    )),
                    Tool::Function => {
                        // Function traces arrive pre-sampled through
                        // add_object; there is nothing to place here.
                        tracing::debug!("function tool ignores pointer placement");
                        return;
                    }
                    Tool::Select => unreachable!(),
                };
                self.add_object(shape);
            }
        }
    }

    /// Pointer move. Mutates the dragged object in place and rebuilds the
    /// raster so picking tracks the drag.
    pub fn pointer_moved(&mut self, device_x: f64, device_y: f64) {
        let Some((id, last)) = self.drag.as_ref().map(|s| (s.id, s.last)) else {
            return;
        };
        let p = self.transform.to_plot(device_x, device_y);
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        let (dx, dy) = (p.x - last.x, p.y - last.y);
        if let Some(object) = self.scene.get_mut(id) {
            object.shape.translate(dx, dy);
        }
        if let Some(session) = self.drag.as_mut() {
            session.last = p;
        }
        self.rebuild_picking();
    }

    /// Pointer release. Ends the drag session unconditionally; a Move
    /// command is recorded only when the coordinates actually changed.
    pub fn pointer_released(&mut self, _device_x: f64, _device_y: f64) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let Some(object) = self.scene.get(session.id) else {
            return;
        };
        let Some(now) = object.shape.anchor_coords() else {
            return;
        };
        if now != session.origin {
            let command = SceneCommand::Move(MoveObject::new(
                session.id,
                object.name.clone(),
                session.origin,
                now,
            ));
            self.history.record_without_executing(command);
            self.is_modified = true;
        }
    }

    /// Renders the current scene to an RGB image.
    pub fn render(&self) -> image::RgbImage {
        renderer::render_scene(&self.scene, &self.transform, &self.axes)
    }

    /// Saves the diagram to a file.
    pub fn save_to_file(&mut self, path: impl AsRef<FsPath>) -> anyhow::Result<()> {
        let file = DiagramFile::from_scene(
            &self.design_name,
            &self.scene,
            self.transform.bounds(),
            &self.axes,
        );
        file.save_to_file(path)?;
        self.is_modified = false;
        Ok(())
    }

    /// Loads a diagram from a file, replacing the current state.
    pub fn load_from_file(&mut self, path: impl AsRef<FsPath>) -> anyhow::Result<()> {
        let file = DiagramFile::load_from_file(path)?;
        self.apply_file(&file)
    }

    /// Replaces editor state from a parsed diagram file.
    pub fn apply_file(&mut self, file: &DiagramFile) -> anyhow::Result<()> {
        let bounds = PlotBounds::new(
            file.bounds.x_min,
            file.bounds.x_max,
            file.bounds.y_min,
            file.bounds.y_max,
        )?;
        if !file.axes.aspect_ratio.is_finite() || file.axes.aspect_ratio <= 0.0 {
            return Err(PlotError::InvalidAspectRatio {
                value: file.axes.aspect_ratio,
            }
            .into());
        }
        let objects = file.to_objects()?;

        self.scene = Scene::new();
        for object in objects {
            self.scene.add(object);
        }
        self.axes = file.axes.clone();
        self.transform.set_bounds(bounds);
        self.transform.set_aspect_ratio(file.axes.aspect_ratio);
        self.history.clear();
        self.drag = None;
        self.design_name = file.metadata.name.clone();
        self.is_modified = false;
        self.rebuild_picking();
        Ok(())
    }
}

impl Default for PlotEditor {
    fn default() -> Self {
        Self::new()
    }
}
