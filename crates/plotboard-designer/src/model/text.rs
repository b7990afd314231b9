use serde::{Deserialize, Serialize};

use plotboard_core::constants::DEFAULT_FONT_SIZE;
use plotboard_core::Rgb;

use super::{PlotShape, Property, PropertyValue};

/// A text label anchored at its baseline start in plot space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Font size in device pixels.
    pub font_size: f64,
    /// Counter-clockwise rotation about the anchor, in degrees.
    pub rotation: f64,
    pub color: Rgb,
}

impl TextLabel {
    pub fn new(text: String, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            text,
            font_size: DEFAULT_FONT_SIZE,
            rotation: 0.0,
            color: Rgb::new(40, 40, 40),
        }
    }
}

impl PlotShape for TextLabel {
    fn bounds(&self) -> (f64, f64, f64, f64) {
        // Plot-space extent is the anchor alone; pixel extent depends on
        // font metrics the model layer does not know about.
        (self.x, self.y, self.x, self.y)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property {
                name: "text".to_string(),
                value: PropertyValue::String(self.text.clone()),
            },
            Property {
                name: "x".to_string(),
                value: PropertyValue::Number(self.x),
            },
            Property {
                name: "y".to_string(),
                value: PropertyValue::Number(self.y),
            },
            Property {
                name: "font_size".to_string(),
                value: PropertyValue::Number(self.font_size),
            },
            Property {
                name: "rotation".to_string(),
                value: PropertyValue::Number(self.rotation),
            },
            Property {
                name: "color".to_string(),
                value: PropertyValue::String(self.color.to_hex()),
            },
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "text" => Some(PropertyValue::String(self.text.clone())),
            "x" => Some(PropertyValue::Number(self.x)),
            "y" => Some(PropertyValue::Number(self.y)),
            "font_size" => Some(PropertyValue::Number(self.font_size)),
            "rotation" => Some(PropertyValue::Number(self.rotation)),
            "color" => Some(PropertyValue::String(self.color.to_hex())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> bool {
        match (name, value) {
            ("text", PropertyValue::String(s)) => {
                self.text = s.clone();
                true
            }
            ("x", PropertyValue::Number(v)) => {
                self.x = *v;
                true
            }
            ("y", PropertyValue::Number(v)) => {
                self.y = *v;
                true
            }
            ("font_size", PropertyValue::Number(v)) => {
                self.font_size = *v;
                true
            }
            ("rotation", PropertyValue::Number(v)) => {
                self.rotation = *v;
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
