//! Scene kernel: the objects, lights and shared material of the showcase,
//! plus the clock and viewport state the frame loop consumes.
//!
//! # Invariants
//! - Object orientation is a pure function of elapsed time, never accumulated.
//! - Elapsed time never decreases.
//! - The frame loop only reads the shared material; the debug panel writes it.

pub mod clock;
pub mod config;
pub mod material;
pub mod scene;
pub mod viewport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AnimationConfig, CameraConfig, ConfigError, ControlsConfig, EnvironmentConfig,
    MaterialConfig, ShowcaseConfig, WindowConfig, MAX_FALLBACK_SIZE,
};
pub use material::{MaterialParams, SharedMaterial};
pub use scene::{AmbientLight, PointLight, Primitive, RotationRates, Scene, SceneObject};
pub use viewport::{MAX_PIXEL_RATIO, ViewportDimensions};

pub fn crate_info() -> &'static str {
    "lumen-scene v0.1.0"
}
