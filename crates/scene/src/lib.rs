//! Scenes and the scene stack.
//!
//! A [`Scene`] owns an entity registry and a [`SceneBehavior`] supplying game logic.
//! The [`SceneManager`] keeps scenes on a stack: only the top scene updates, every scene
//! renders bottom to top.
//!
//! # Invariants
//! - Stack operations are requests. They take effect only in
//!   [`SceneManager::process_pending`], so a scene never sees the stack change mid-update.
//! - One request slot: a later request in the same frame replaces the earlier one.
//! - At most one scene is active, and it is the top of the stack.

mod manager;
mod scene;

pub use manager::{PendingOp, SceneManager, SceneRequests, TransitionCallback};
pub use scene::{render_sprites, RenderContext, Scene, SceneBehavior, UpdateContext};

pub fn crate_info() -> &'static str {
    "isoworks-scene v0.1.0"
}
