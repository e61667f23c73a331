//! Input mapping: host pointer and key events turned into control actions.
//!
//! # Invariants
//! - Consumers act on [`ControlAction`]s, never on raw window events.
//! - Only one drag gesture is active at a time.

pub mod action;
pub mod pointer;

pub use action::{ControlAction, Key};
pub use pointer::{PointerButton, PointerTracker};

pub fn crate_info() -> &'static str {
    "lumen-input v0.1.0"
}
