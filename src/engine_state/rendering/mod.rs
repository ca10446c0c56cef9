//! # Rendering Module
//!
//! Turns block data into GPU-ready geometry.
//!
//! * `vertex` - The vertex record and the layout vertex arrays are created with
//! * `meshing` - Face culling and the per-pass geometry it produces

pub mod meshing;
pub mod vertex;
