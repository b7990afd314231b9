use serde::{Deserialize, Serialize};

use plotboard_core::constants::DEFAULT_POINT_SIZE;
use plotboard_core::Rgb;

use super::{PlotShape, Property, PropertyValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub x: f64,
    pub y: f64,
    /// Marker radius in device pixels.
    pub size: f64,
    pub color: Rgb,
}

impl PointMarker {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: DEFAULT_POINT_SIZE,
            color: Rgb::default(),
        }
    }
}

impl PlotShape for PointMarker {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x, self.y)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property {
                name: "x".to_string(),
                value: PropertyValue::Number(self.x),
            },
            Property {
                name: "y".to_string(),
                value: PropertyValue::Number(self.y),
            },
            Property {
                name: "size".to_string(),
                value: PropertyValue::Number(self.size),
            },
            Property {
                name: "color".to_string(),
                value: PropertyValue::String(self.color.to_hex()),
            },
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "x" => Some(PropertyValue::Number(self.x)),
            "y" => Some(PropertyValue::Number(self.y)),
            "size" => Some(PropertyValue::Number(self.size)),
            "color" => Some(PropertyValue::String(self.color.to_hex())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match (name, value) {
            ("x", PropertyValue::Number(v)) => {
                self.x = *v;
                true
            }
            ("y", PropertyValue::Number(v)) => {
                self.y = *v;
                true
            }
            ("size", PropertyValue::Number(v)) => {
                self.size = *v;
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
