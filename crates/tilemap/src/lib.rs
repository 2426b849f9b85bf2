//! Isometric tile world: projection between tile and screen space, a flat tile grid,
//! viewport culling and back-to-front depth ordering.
//!
//! # Invariants
//! - `screen_to_tile(tile_to_screen(p)) == p` up to float rounding, for any camera.
//! - Visible tiles are yielded in non-decreasing depth key order; ties keep row-major
//!   scan order.
//! - Out-of-bounds reads return the empty tile, never panic.

mod map;
mod projection;

pub use map::{Tile, TileMap, TileRenderStats, VisibleTile};
pub use projection::IsoProjection;

pub fn crate_info() -> &'static str {
    "isoworks-tilemap v0.1.0"
}
