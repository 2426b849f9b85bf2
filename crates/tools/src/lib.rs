//! Developer tooling: read-only inspection of the scene stack and its entities.
//!
//! # Invariants
//! - Tools never mutate what they inspect.

mod inspector;

pub use inspector::{EntityInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "isoworks-tools v0.1.0"
}
