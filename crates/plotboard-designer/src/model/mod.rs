use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod area;
mod brace;
mod function;
mod line;
mod point;
mod text;

pub use area::AreaRect;
pub use brace::{brace_path, BraceSpan, BraceStyle};
pub use function::FunctionTrace;
pub use line::LineSegment;
pub use point::PointMarker;
pub use text::TextLabel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Bool(bool),
}

/// Absolute coordinate bundle captured before and after a move.
///
/// Single-anchor objects (points, text) carry one pair; two-anchor objects
/// (lines, areas, braces) carry both endpoints. Function traces have no
/// bundle and cannot be moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveCoords {
    Single { x: f64, y: f64 },
    Pair { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// Behavior common to every object variant.
pub trait PlotShape {
    /// Axis-aligned bounding box in plot space as (min_x, min_y, max_x, max_y).
    fn bounds(&self) -> (f64, f64, f64, f64);

    /// Shifts the object's plot-space anchors by the given delta.
    fn translate(&mut self, dx: f64, dy: f64);

    /// All editable properties, for the inspector boundary.
    fn properties(&self) -> Vec<Property>;

    /// Reads a single property by name.
    fn property(&self, name: &str) -> Option<PropertyValue>;

    /// Writes a single property by name. Returns false when the name is
    /// unknown or the value has the wrong type.
    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Point,
    Line,
    Area,
    Text,
    Brace,
    Function,
}

impl ObjectKind {
    /// Stable lowercase tag used in design files.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::Point => "point",
            ObjectKind::Line => "line",
            ObjectKind::Area => "area",
            ObjectKind::Text => "text",
            ObjectKind::Brace => "brace",
            ObjectKind::Function => "function",
        }
    }

    /// Parses a design-file tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "point" => Some(ObjectKind::Point),
            "line" => Some(ObjectKind::Line),
            "area" => Some(ObjectKind::Area),
            "text" => Some(ObjectKind::Text),
            "brace" => Some(ObjectKind::Brace),
            "function" => Some(ObjectKind::Function),
            _ => None,
        }
    }

    /// Human-readable name for lists and command descriptions.
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectKind::Point => "Point",
            ObjectKind::Line => "Line",
            ObjectKind::Area => "Area",
            ObjectKind::Text => "Text",
            ObjectKind::Brace => "Brace",
            ObjectKind::Function => "Function",
        }
    }
}

/// The closed union of object geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectShape {
    Point(PointMarker),
    Line(LineSegment),
    Area(AreaRect),
    Text(TextLabel),
    Brace(BraceSpan),
    Function(FunctionTrace),
}

impl ObjectShape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectShape::Point(_) => ObjectKind::Point,
            ObjectShape::Line(_) => ObjectKind::Line,
            ObjectShape::Area(_) => ObjectKind::Area,
            ObjectShape::Text(_) => ObjectKind::Text,
            ObjectShape::Brace(_) => ObjectKind::Brace,
            ObjectShape::Function(_) => ObjectKind::Function,
        }
    }

    /// The object's movable anchor coordinates, if it has any.
    pub fn anchor_coords(&self) -> Option<MoveCoords> {
        match self {
            ObjectShape::Point(s) => Some(MoveCoords::Single { x: s.x, y: s.y }),
            ObjectShape::Text(s) => Some(MoveCoords::Single { x: s.x, y: s.y }),
            ObjectShape::Line(s) => Some(MoveCoords::Pair {
                x1: s.start.x,
                y1: s.start.y,
                x2: s.end.x,
                y2: s.end.y,
            }),
            ObjectShape::Area(s) => Some(MoveCoords::Pair {
                x1: s.start.x,
                y1: s.start.y,
                x2: s.end.x,
                y2: s.end.y,
            }),
            ObjectShape::Brace(s) => Some(MoveCoords::Pair {
                x1: s.start.x,
                y1: s.start.y,
                x2: s.end.x,
                y2: s.end.y,
            }),
            ObjectShape::Function(_) => None,
        }
    }

    /// Restores anchors captured by [`anchor_coords`](Self::anchor_coords).
    /// A bundle that does not match the variant is ignored.
    pub fn set_anchor_coords(&mut self, coords: MoveCoords) {
        match (self, coords) {
            (ObjectShape::Point(s), MoveCoords::Single { x, y }) => {
                s.x = x;
                s.y = y;
            }
            (ObjectShape::Text(s), MoveCoords::Single { x, y }) => {
                s.x = x;
                s.y = y;
            }
            (ObjectShape::Line(s), MoveCoords::Pair { x1, y1, x2, y2 }) => {
                s.start = Point::new(x1, y1);
                s.end = Point::new(x2, y2);
            }
            (ObjectShape::Area(s), MoveCoords::Pair { x1, y1, x2, y2 }) => {
                s.start = Point::new(x1, y1);
                s.end = Point::new(x2, y2);
            }
            (ObjectShape::Brace(s), MoveCoords::Pair { x1, y1, x2, y2 }) => {
                s.start = Point::new(x1, y1);
                s.end = Point::new(x2, y2);
            }
            (shape, _) => {
                tracing::warn!(kind = shape.kind().tag(), "mismatched move bundle ignored");
            }
        }
    }
}

impl PlotShape for ObjectShape {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        match self {
            ObjectShape::Point(s) => s.bounds(),
            ObjectShape::Line(s) => s.bounds(),
            ObjectShape::Area(s) => s.bounds(),
            ObjectShape::Text(s) => s.bounds(),
            ObjectShape::Brace(s) => s.bounds(),
            ObjectShape::Function(s) => s.bounds(),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            ObjectShape::Point(s) => s.translate(dx, dy),
            ObjectShape::Line(s) => s.translate(dx, dy),
            ObjectShape::Area(s) => s.translate(dx, dy),
            ObjectShape::Text(s) => s.translate(dx, dy),
            ObjectShape::Brace(s) => s.translate(dx, dy),
            ObjectShape::Function(s) => s.translate(dx, dy),
        }
    }

    fn properties(&self) -> Vec<Property> {
        match self {
            ObjectShape::Point(s) => s.properties(),
            ObjectShape::Line(s) => s.properties(),
            ObjectShape::Area(s) => s.properties(),
            ObjectShape::Text(s) => s.properties(),
            ObjectShape::Brace(s) => s.properties(),
            ObjectShape::Function(s) => s.properties(),
        }
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        match self {
            ObjectShape::Point(s) => s.property(name),
            ObjectShape::Line(s) => s.property(name),
            ObjectShape::Area(s) => s.property(name),
            ObjectShape::Text(s) => s.property(name),
            ObjectShape::Brace(s) => s.property(name),
            ObjectShape::Function(s) => s.property(name),
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match self {
            ObjectShape::Point(s) => s.set_property(name, value),
            ObjectShape::Line(s) => s.set_property(name, value),
            ObjectShape::Area(s) => s.set_property(name, value),
            ObjectShape::Text(s) => s.set_property(name, value),
            ObjectShape::Brace(s) => s.set_property(name, value),
            ObjectShape::Function(s) => s.set_property(name, value),
        }
    }
}

/// An object placed on the diagram: a stable id, a display name, a paint
/// priority, and the variant geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotObject {
    pub id: Uuid,
    pub name: String,
    /// Paint and pick priority; higher draws on top, ties break by
    /// insertion order.
    pub z_index: i32,
    pub shape: ObjectShape,
}

impl PlotObject {
    /// Creates an object with a fresh id and a name derived from its kind.
    pub fn new(shape: ObjectShape) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: shape.kind().display_name().to_string(),
            z_index: 0,
            shape,
        }
    }

    /// Sets the paint priority.
    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.shape.bounds()
    }
}
