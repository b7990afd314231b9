use serde::{Deserialize, Serialize};

use plotboard_core::constants::DEFAULT_STROKE_WIDTH;
use plotboard_core::Rgb;

use super::{PlotShape, Point, Property, PropertyValue};

/// A plotted function trace.
///
/// Expression evaluation and sampling happen outside the editor core; the
/// trace carries the expression for display and round-tripping, and the
/// sampled polyline supplied by the caller for rendering and picking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTrace {
    pub expression: String,
    pub samples: Vec<Point>,
    /// Stroke width in device pixels.
    pub width: f64,
    pub color: Rgb,
}

impl FunctionTrace {
    pub fn new(expression: String, samples: Vec<Point>) -> Self {
        Self {
            expression,
            samples,
            width: DEFAULT_STROKE_WIDTH,
            color: Rgb::new(214, 39, 40),
        }
    }
}

impl PlotShape for FunctionTrace {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.samples {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if min_x > max_x {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (min_x, min_y, max_x, max_y)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.samples {
            p.x += dx;
            p.y += dy;
        }
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property {
                name: "expression".to_string(),
                value: PropertyValue::String(self.expression.clone()),
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
            "expression" => Some(PropertyValue::String(self.expression.clone())),
            "width" => Some(PropertyValue::Number(self.width)),
            "color" => Some(PropertyValue::String(self.color.to_hex())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match (name, value) {
            ("expression", PropertyValue::String(s)) => {
                self.expression = s.clone();
                true
            }
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
