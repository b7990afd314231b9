//! # PlotBoard Core
//!
//! Core constants, shared value types, and error handling for PlotBoard.
//! Provides the fundamental pieces the designer crate builds on: the raster
//! surface dimensions, picking tolerances, history limits, and the error
//! taxonomy shared across the editor.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{PlotError, Result};
pub use types::Rgb;
