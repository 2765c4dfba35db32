//! Forms module.
//!
//! Field trees with converters, widgets, validation and rendering.

pub use trellis_forms::*;
