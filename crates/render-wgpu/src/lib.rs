//! wgpu render backend for the showcase.
//!
//! Tessellates the scene's primitives once, then draws them every frame with
//! a metal/rough shader lit by the scene lights and an environment cube-map.
//!
//! # Invariants
//! - The backend never mutates the scene; material values are read through
//!   snapshots.
//! - Surface size follows the logical size times the pixel ratio and is only
//!   reconfigured when that product changes.

mod gpu;
mod mesh;
mod shaders;
mod surface;

pub use gpu::{FALLBACK_SKY, MeshRenderer};
pub use mesh::{MeshData, Vertex};
pub use surface::{GpuInitError, SurfaceFrame, SurfaceRenderer};
