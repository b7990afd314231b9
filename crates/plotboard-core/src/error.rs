//! Error handling for PlotBoard.
//!
//! Validation failures are rejected at the editor boundary before they can
//! reach the transform, picking, or command layers; nothing inside those
//! layers panics on bad geometry. All error types use `thiserror`.

use thiserror::Error;

/// Editor-level error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Plot bounds with an empty or inverted range.
    #[error("Invalid {axis} bounds: [{min}, {max}] is not an increasing range")]
    InvalidBounds {
        /// The axis name ("x" or "y").
        axis: &'static str,
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },

    /// Aspect ratio that is zero, negative, or non-finite.
    #[error("Aspect ratio must be positive and finite, got {value}")]
    InvalidAspectRatio {
        /// The rejected value.
        value: f64,
    },

    /// A property edit was requested but nothing is selected.
    #[error("No object is selected")]
    NoSelection,

    /// A property name the target object does not carry.
    #[error("Unknown property: {name}")]
    UnknownProperty {
        /// The property name as supplied.
        name: String,
    },

    /// An object type tag that is not one of the known variants.
    #[error("Unknown object type: {tag}")]
    UnknownObjectType {
        /// The type tag as read from the file.
        tag: String,
    },
}

/// Convenience result alias for editor operations.
pub type Result<T> = std::result::Result<T, PlotError>;
