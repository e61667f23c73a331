//! Rendering adapter: renderer-agnostic frame loop.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate either.
//! - Camera aspect and renderer size always match the latest viewport.
//! - Object orientation is assigned from elapsed time on every frame.
//!
//! The [`Renderer`] trait is the seam between the loop and a backend. The
//! [`DebugTextRenderer`] describes frames as text so the loop can run and be
//! tested without a GPU surface.

mod camera;
mod context;
mod driver;
mod renderer;

pub use camera::{OrbitControls, PerspectiveCamera};
pub use context::SceneContext;
pub use driver::{AnimationDriver, FrameFlag, FrameScheduler, StopHandle};
pub use renderer::{DebugTextRenderer, FrameRecord, RenderError, Renderer};

pub fn crate_info() -> &'static str {
    "lumen-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
