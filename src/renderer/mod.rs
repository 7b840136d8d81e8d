//! WebGPU rendering module
//!
//! Stars are instanced capsule quads shaded in the fragment shader; ships and
//! the planet are world-space line lists.

pub mod shapes;
pub mod starfield_pipeline;
pub mod vertex;

pub use starfield_pipeline::{StarfieldRenderer, line_vertices, star_instances};
