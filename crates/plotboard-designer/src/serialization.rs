//! Serialization for diagram files.
//!
//! Diagrams save to JSON with complete state preservation: plot bounds,
//! axes presentation, and a flat record per object sufficient to rebuild
//! it losslessly, ids included, so rendering and picking behave
//! identically after a round trip.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use plotboard_core::{PlotError, Rgb};

use crate::model::{
    AreaRect, BraceSpan, BraceStyle, FunctionTrace, LineSegment, ObjectKind, ObjectShape,
    PlotObject, Point, PointMarker, TextLabel,
};
use crate::scene::Scene;
use crate::transform::{AxesView, PlotBounds};

/// Diagram file format version.
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete diagram file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramFile {
    pub version: String,
    pub metadata: DiagramMetadata,
    pub bounds: PlotBounds,
    pub axes: AxesView,
    pub objects: Vec<ObjectData>,
}

/// Diagram metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Serialized object data: one flat field set covering every variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectData {
    pub id: String,
    pub object_type: String,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub x2: f64,
    #[serde(default)]
    pub y2: f64,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub font_size: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub mirrored: bool,
    #[serde(default)]
    pub brace_style: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub samples: Vec<(f64, f64)>,
}

impl DiagramFile {
    /// Creates an empty diagram file with default values.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DiagramMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            bounds: PlotBounds::default(),
            axes: AxesView::default(),
            objects: Vec::new(),
        }
    }

    /// Captures the current scene and axes configuration.
    pub fn from_scene(name: &str, scene: &Scene, bounds: PlotBounds, axes: &AxesView) -> Self {
        let mut file = Self::new(name);
        file.bounds = bounds;
        file.axes = axes.clone();
        file.objects = scene.iter().map(Self::from_object).collect();
        file
    }

    /// Saves the diagram to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize diagram")?;
        std::fs::write(path.as_ref(), json).context("Failed to write diagram file")?;
        Ok(())
    }

    /// Loads a diagram from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read diagram file")?;
        let mut diagram: DiagramFile =
            serde_json::from_str(&content).context("Failed to parse diagram file")?;
        diagram.metadata.modified = Utc::now();
        Ok(diagram)
    }

    /// Converts a scene object to its flat record.
    pub fn from_object(object: &PlotObject) -> ObjectData {
        let mut data = ObjectData {
            id: object.id.to_string(),
            object_type: object.kind().tag().to_string(),
            z_index: object.z_index,
            ..Default::default()
        };

        match &object.shape {
            ObjectShape::Point(p) => {
                data.x = p.x;
                data.y = p.y;
                data.size = p.size;
                data.color = p.color.to_hex();
            }
            ObjectShape::Line(l) => {
                data.x = l.start.x;
                data.y = l.start.y;
                data.x2 = l.end.x;
                data.y2 = l.end.y;
                data.width = l.width;
                data.color = l.color.to_hex();
            }
            ObjectShape::Area(a) => {
                data.x = a.start.x;
                data.y = a.start.y;
                data.x2 = a.end.x;
                data.y2 = a.end.y;
                data.color = a.fill.to_hex();
            }
            ObjectShape::Text(t) => {
                data.x = t.x;
                data.y = t.y;
                data.text = t.text.clone();
                data.font_size = t.font_size;
                data.rotation = t.rotation;
                data.color = t.color.to_hex();
            }
            ObjectShape::Brace(b) => {
                data.x = b.start.x;
                data.y = b.start.y;
                data.x2 = b.end.x;
                data.y2 = b.end.y;
                data.elevation = b.elevation;
                data.mirrored = b.mirrored;
                data.brace_style = b.style.tag().to_string();
                data.width = b.width;
                data.color = b.color.to_hex();
            }
            ObjectShape::Function(f) => {
                data.expression = f.expression.clone();
                data.samples = f.samples.iter().map(|p| (p.x, p.y)).collect();
                data.width = f.width;
                data.color = f.color.to_hex();
            }
        }

        data
    }

    /// Rebuilds a scene object from its flat record.
    pub fn to_object(data: &ObjectData) -> Result<PlotObject> {
        let kind = ObjectKind::from_tag(&data.object_type).ok_or_else(|| {
            PlotError::UnknownObjectType {
                tag: data.object_type.clone(),
            }
        })?;
        let id = Uuid::parse_str(&data.id)
            .with_context(|| format!("Invalid object id: {}", data.id))?;
        let color = Rgb::from_hex(&data.color).unwrap_or_default();

        let shape = match kind {
            ObjectKind::Point => {
                let mut p = PointMarker::new(data.x, data.y);
                if data.size > 0.0 {
                    p.size = data.size;
                }
                p.color = color;
                ObjectShape::Point(p)
            }
            ObjectKind::Line => {
                let mut l =
                    LineSegment::new(Point::new(data.x, data.y), Point::new(data.x2, data.y2));
                if data.width > 0.0 {
                    l.width = data.width;
                }
                l.color = color;
                ObjectShape::Line(l)
            }
            ObjectKind::Area => {
                let mut a = AreaRect::new(Point::new(data.x, data.y), Point::new(data.x2, data.y2));
                if let Some(fill) = Rgb::from_hex(&data.color) {
                    a.fill = fill;
                }
                ObjectShape::Area(a)
            }
            ObjectKind::Text => {
                let mut t = TextLabel::new(data.text.clone(), data.x, data.y);
                if data.font_size > 0.0 {
                    t.font_size = data.font_size;
                }
                t.rotation = data.rotation;
                t.color = color;
                ObjectShape::Text(t)
            }
            ObjectKind::Brace => {
                let style = BraceStyle::from_tag(&data.brace_style).unwrap_or(BraceStyle::Smooth);
                let mut b = BraceSpan::new(
                    Point::new(data.x, data.y),
                    Point::new(data.x2, data.y2),
                    style,
                );
                b.elevation = data.elevation;
                b.mirrored = data.mirrored;
                if data.width > 0.0 {
                    b.width = data.width;
                }
                b.color = color;
                ObjectShape::Brace(b)
            }
            ObjectKind::Function => {
                let samples = data
                    .samples
                    .iter()
                    .map(|(x, y)| Point::new(*x, *y))
                    .collect();
                let mut f = FunctionTrace::new(data.expression.clone(), samples);
                if data.width > 0.0 {
                    f.width = data.width;
                }
                f.color = color;
                ObjectShape::Function(f)
            }
        };

        Ok(PlotObject {
            id,
            name: kind.display_name().to_string(),
            z_index: data.z_index,
            shape,
        })
    }

    /// Rebuilds all objects, failing on the first malformed record.
    pub fn to_objects(&self) -> Result<Vec<PlotObject>> {
        self.objects.iter().map(Self::to_object).collect()
    }
}
