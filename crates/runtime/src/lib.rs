//! Runtime: configuration, the fixed-timestep loop and the [`Engine`] that ties scenes,
//! atlases, projection and input together.
//!
//! # Invariants
//! - Within a frame: input sampling, then fixed updates, then render, then the scene
//!   stack flush. A scene never observes a stack change mid-update.
//! - Fixed updates per frame never exceed `max_frame_skip`.
//! - The stop flag is only checked between frames.

mod config;
mod engine;
mod game_loop;
mod timer;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, FrameReport};
pub use game_loop::{GameLoop, Tick};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "isoworks-runtime v0.1.0"
}
