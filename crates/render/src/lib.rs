//! Rendering Adapter: renderer-agnostic sprite batching interface.
//!
//! # Invariants
//! - The engine core never talks to a GPU; it only submits `Sprite` draw commands
//!   inside a `begin_batch`/`end_batch` bracket.
//! - A texture handle of 0 is a failed or absent texture and never reaches a draw call
//!   submitted by the core.
//!
//! # Headless backends
//! `RecordingRenderer` and `HeadlessTextures` stand in for a real backend in tests and
//! in the CLI. The traits are stable; a GPU backend implements them without changing
//! consumers.

mod headless;
mod renderer;

pub use headless::{HeadlessTextures, RecordedBatch, RecordingRenderer};
pub use renderer::{Renderer, Sprite, TextureFilter, TextureInfo, TextureLoader};

pub fn crate_info() -> &'static str {
    "isoworks-render v0.1.0"
}
