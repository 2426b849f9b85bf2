//! Sprite atlas pipeline: one texture sliced into named frames plus timed animations.
//!
//! Atlases live in an [`AtlasStore`] arena and are referenced by [`AtlasHandle`]. Users
//! of an atlas (animators, tile maps) hold the handle, never the atlas itself.
//!
//! # Invariants
//! - Animation frame indices reference valid frames at definition time; unknown
//!   indices and names are dropped while defining.
//! - Out-of-range frame lookups return `None`, never panic.
//! - Releasing an atlas twice is a no-op.

mod atlas;
mod descriptor;
mod player;
mod store;

pub use atlas::{Animation, AtlasError, GridLayout, SpriteAtlas, SpriteFrame};
pub use descriptor::{AnimationDescriptor, AnimationFrames, AtlasDescriptor, FrameDescriptor};
pub use player::AnimationPlayer;
pub use store::{AtlasHandle, AtlasStore};

pub fn crate_info() -> &'static str {
    "isoworks-assets v0.1.0"
}
