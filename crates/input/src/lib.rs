//! Input mapping: raw key state in, named actions and axes out.
//!
//! The platform layer implements [`KeyState`]. Once per frame [`InputMap::update`]
//! samples it; every query afterwards reads that snapshot, so press and release edges
//! are stable for the whole frame.
//!
//! # Invariants
//! - An action is pressed on exactly one update: the first one where any binding is held.
//! - Axis values are clamped to `[-1, 1]`; the movement vector never exceeds length 1.

mod camera;
mod keys;
mod map;

pub use camera::CameraController;
pub use keys::{Binding, Key, KeyState, MouseButton, ScriptedKeys};
pub use map::{InputAction, InputAxis, InputMap};

pub fn crate_info() -> &'static str {
    "isoworks-input v0.1.0"
}
