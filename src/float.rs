//! Wrapper module to allow switching the float type globally.
//!
//! Geometry, radii and growth rates all go through [`Float`]; the associated constants from
//! `f32` are re-exported here so the rest of the crate doesn't need to name the concrete type.

/// Type alias for the selected global float type
pub type Float = f32;

pub use std::f32::consts::*;
