//! Shared value types used across the isoworks crates.
//!
//! # Invariants
//! - Texture handle 0 is reserved as "invalid / none".
//! - All types here are plain `Copy` data with no ownership semantics.

mod types;

pub use glam::{IVec2, Vec2};
pub use types::{Color, Rect, TextureHandle, TextureRegion};

pub fn crate_info() -> &'static str {
    "isoworks-common v0.1.0"
}
