//! Developer tooling: the material debug panel binding and the scene
//! inspector.
//!
//! # Invariants
//! - Panel writes are clamped to the parameter range before they reach the
//!   material.
//! - The inspector only reads.

pub mod inspector;
pub mod panel;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};
pub use panel::{MaterialPanel, MaterialParam, ParamSpec};

pub fn crate_info() -> &'static str {
    "lumen-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
