use serde::{Deserialize, Serialize};

use plotboard_core::Rgb;

use super::{PlotShape, Point, Property, PropertyValue};

/// A filled axis-aligned rectangle spanned by two opposite corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRect {
    pub start: Point,
    pub end: Point,
    pub fill: Rgb,
}

impl AreaRect {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            fill: Rgb::new(174, 199, 232),
        }
    }
}

impl PlotShape for AreaRect {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start.x += dx;
        self.start.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property {
                name: "x1".to_string(),
                value: PropertyValue::Number(self.start.x),
            },
            Property {
                name: "y1".to_string(),
                value: PropertyValue::Number(self.start.y),
            },
            Property {
                name: "x2".to_string(),
                value: PropertyValue::Number(self.end.x),
            },
            Property {
                name: "y2".to_string(),
                value: PropertyValue::Number(self.end.y),
            },
            Property {
                name: "fill".to_string(),
                value: PropertyValue::String(self.fill.to_hex()),
            },
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "x1" => Some(PropertyValue::Number(self.start.x)),
            "y1" => Some(PropertyValue::Number(self.start.y)),
            "x2" => Some(PropertyValue::Number(self.end.x)),
            "y2" => Some(PropertyValue::Number(self.end.y)),
            "fill" => Some(PropertyValue::String(self.fill.to_hex())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match (name, value) {
            ("x1", PropertyValue::Number(v)) => {
                self.start.x = *v;
                true
            }
            ("y1", PropertyValue::Number(v)) => {
                self.start.y = *v;
                true
            }
            ("x2", PropertyValue::Number(v)) => {
                self.end.x = *v;
                true
            }
            ("y2", PropertyValue::Number(v)) => {
                self.end.y = *v;
                true
            }
            ("fill", PropertyValue::String(s)) => match Rgb::from_hex(s) {
                Some(c) => {
                    self.fill = c;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}
