use glam::Vec2;
use isoworks_assets::{AtlasHandle, AtlasStore};
use isoworks_common::{Color, Rect};
use isoworks_render::{Renderer, Sprite};

use crate::projection::IsoProjection;

/// One grid cell. `tile_id` is a 1-based index into the tileset frames; `0` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub tile_id: u32,
    /// Elevation in whole tile heights.
    pub height: i32,
    pub flags: u8,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        tile_id: 0,
        height: 0,
        flags: 0,
    };

    pub fn new(tile_id: u32) -> Self {
        Self {
            tile_id,
            ..Self::EMPTY
        }
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tile_id == 0
    }
}

static EMPTY_TILE: Tile = Tile::EMPTY;

/// A tile that survived culling, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub x: i32,
    pub y: i32,
    pub tile: Tile,
    pub screen: Vec2,
    pub depth_key: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileRenderStats {
    /// Tiles that passed culling.
    pub visible: usize,
    /// Tiles actually submitted to the renderer.
    pub drawn: usize,
}

/// Row-major `width x height` grid of tiles drawn from one tileset atlas.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    tileset: Option<AtlasHandle>,
}

impl TileMap {
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = Self::default();
        map.resize(width, height);
        map
    }

    /// Reallocate to the new size. All tiles become empty.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.tiles.clear();
        self.tiles
            .resize(self.width as usize * self.height as usize, Tile::EMPTY);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Tile at `(x, y)`, or the empty tile outside the map.
    pub fn get(&self, x: i32, y: i32) -> &Tile {
        match self.index(x, y) {
            Some(i) => &self.tiles[i],
            None => &EMPTY_TILE,
        }
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let i = self.index(x, y)?;
        self.tiles.get_mut(i)
    }

    /// Returns false when `(x, y)` is outside the map.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    pub fn tileset(&self) -> Option<AtlasHandle> {
        self.tileset
    }

    pub fn set_tileset(&mut self, tileset: Option<AtlasHandle>) {
        self.tileset = tileset;
    }

    /// Non-empty tiles intersecting `viewport`, sorted back to front.
    pub fn visible_tiles(&self, projection: &IsoProjection, viewport: Rect) -> Vec<VisibleTile> {
        let _span = tracing::info_span!("tile_visibility").entered();

        let corners = viewport.corners().map(|c| projection.screen_to_tile(c));
        let (lo, hi) = corners
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), c| (lo.min(*c), hi.max(*c)));

        // Clamp in f32 first: a far camera puts the bounds outside i32.
        let min_x = (lo.x.floor() - 2.0).max(0.0) as i32;
        let max_x = ((hi.x.ceil() + 2.0).min((self.width - 1) as f32) as i32).min(self.width - 1);
        let min_y = (lo.y.floor() - 2.0).max(0.0) as i32;
        let max_y = ((hi.y.ceil() + 2.0).min((self.height - 1) as f32) as i32).min(self.height - 1);
        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }

        let margin_x = projection.tile_width();
        let margin_y = projection.tile_height() * 2.0;
        let left = viewport.x - margin_x;
        let right = viewport.x + viewport.width + margin_x;
        let top = viewport.y - margin_y;
        let bottom = viewport.y + viewport.height + margin_y;

        let mut visible = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let tile = *self.get(x, y);
                if tile.is_empty() {
                    continue;
                }
                let screen = projection.tile_to_screen_i(x, y);
                if screen.x < left || screen.x > right || screen.y < top || screen.y > bottom {
                    continue;
                }
                visible.push(VisibleTile {
                    x,
                    y,
                    tile,
                    screen,
                    depth_key: IsoProjection::depth_key(x, y, tile.height),
                });
            }
        }
        // Stable: equal depth keeps row-major order.
        visible.sort_by_key(|t| t.depth_key);

        tracing::trace!(
            scanned = (max_x - min_x + 1) as i64 * (max_y - min_y + 1) as i64,
            visible = visible.len(),
            "tile visibility pass"
        );
        visible
    }

    /// Invoke `f` for each visible tile in draw order.
    pub fn for_each_visible(
        &self,
        projection: &IsoProjection,
        viewport: Rect,
        mut f: impl FnMut(&VisibleTile),
    ) {
        for tile in &self.visible_tiles(projection, viewport) {
            f(tile);
        }
    }

    /// Draw the visible tiles in one batch.
    ///
    /// Tiles are anchored bottom-center and lifted by `height` tile heights. Without a
    /// loaded tileset nothing is drawn and no batch is opened.
    pub fn render(
        &self,
        projection: &IsoProjection,
        viewport: Rect,
        atlases: &AtlasStore,
        renderer: &mut dyn Renderer,
    ) -> TileRenderStats {
        let Some(tileset) = self.tileset.and_then(|h| atlases.get(h)) else {
            return TileRenderStats::default();
        };
        if !tileset.is_valid() {
            tracing::warn!(tileset = ?self.tileset, "tileset has no valid texture, skipping map");
            return TileRenderStats::default();
        }

        let mut stats = TileRenderStats::default();
        renderer.begin_batch();
        self.for_each_visible(projection, viewport, |v| {
            stats.visible += 1;
            let Some(frame) = tileset.frame(v.tile.tile_id as usize - 1) else {
                tracing::trace!(tile_id = v.tile.tile_id, x = v.x, y = v.y, "no tileset frame");
                return;
            };
            let lift = v.tile.height as f32 * projection.tile_height();
            renderer.draw_sprite(&Sprite {
                position: Vec2::new(v.screen.x, v.screen.y - lift),
                size: Vec2::new(frame.width as f32, frame.height as f32),
                region: frame.region,
                tint: Color::WHITE,
                rotation: 0.0,
                origin: Vec2::new(0.5, 1.0),
            });
            stats.drawn += 1;
        });
        renderer.end_batch();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoworks_assets::{GridLayout, SpriteAtlas};
    use isoworks_common::TextureHandle;
    use isoworks_render::RecordingRenderer;

    fn filled(w: i32, h: i32) -> TileMap {
        let mut map = TileMap::new(w, h);
        map.fill(Tile::new(1));
        map
    }

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 256.0, 256.0)
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let mut map = filled(2, 2);
        assert!(map.get(-1, 0).is_empty());
        assert!(map.get(2, 0).is_empty());
        assert!(map.get_mut(0, 5).is_none());
        assert!(!map.set(9, 9, Tile::new(3)));
        assert!(map.set(1, 1, Tile::new(3)));
        assert_eq!(map.get(1, 1).tile_id, 3);
    }

    #[test]
    fn resize_clears_tiles() {
        let mut map = filled(2, 2);
        map.resize(3, 1);
        assert_eq!(map.width(), 3);
        assert!(map.get(0, 0).is_empty());
        map.resize(-4, 2);
        assert_eq!(map.width(), 0);
        assert!(map.visible_tiles(&IsoProjection::default(), viewport()).is_empty());
    }

    #[test]
    fn three_by_three_enumerates_all_tiles_back_to_front() {
        let map = filled(3, 3);
        let visible = map.visible_tiles(&IsoProjection::default(), viewport());
        assert_eq!(visible.len(), 9);
        let order: Vec<(i32, i32)> = visible.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2), (2, 1), (1, 2), (2, 2)]
        );
        assert!(visible.windows(2).all(|w| w[0].x + w[0].y <= w[1].x + w[1].y));
    }

    #[test]
    fn empty_tiles_are_skipped() {
        let mut map = filled(3, 3);
        map.set(1, 1, Tile::EMPTY);
        let visible = map.visible_tiles(&IsoProjection::default(), viewport());
        assert_eq!(visible.len(), 8);
        assert!(!visible.iter().any(|t| t.x == 1 && t.y == 1));
    }

    #[test]
    fn raised_tiles_sort_last() {
        let mut map = filled(3, 3);
        map.set(0, 0, Tile::new(1).with_height(1));
        let visible = map.visible_tiles(&IsoProjection::default(), viewport());
        let last = visible.last().unwrap();
        assert_eq!((last.x, last.y), (0, 0));
        assert_eq!(last.depth_key, 1000);
    }

    #[test]
    fn culls_tiles_far_from_camera() {
        let map = filled(64, 64);
        let mut proj = IsoProjection::default();
        let all = map.visible_tiles(&proj, Rect::new(0.0, 0.0, 4096.0, 4096.0)).len();
        let near = map.visible_tiles(&proj, viewport()).len();
        assert!(near < all);

        proj.set_camera(Vec2::new(-100_000.0, -100_000.0));
        assert!(map.visible_tiles(&proj, viewport()).is_empty());
    }

    #[test]
    fn extreme_camera_culls_everything() {
        let map = filled(3, 3);
        let mut proj = IsoProjection::default();
        for camera in [
            Vec2::new(1e12, 1e12),
            Vec2::new(-1e12, -1e12),
            Vec2::new(1e12, -1e12),
            Vec2::new(f32::MAX, f32::MIN),
        ] {
            proj.set_camera(camera);
            assert!(map.visible_tiles(&proj, viewport()).is_empty(), "camera {camera}");
        }
    }

    #[test]
    fn for_each_visible_matches_visible_tiles() {
        let map = filled(5, 5);
        let proj = IsoProjection::default();
        let mut seen = Vec::new();
        map.for_each_visible(&proj, viewport(), |t| seen.push(*t));
        assert_eq!(seen, map.visible_tiles(&proj, viewport()));
    }

    #[test]
    fn render_draws_one_batch_with_tile_frames() {
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(4), 128, 32);
        atlas.define_grid(GridLayout::cells(64, 32));
        let mut store = AtlasStore::new();
        let handle = store.insert("tiles", atlas);

        let mut map = filled(2, 2);
        map.set(1, 1, Tile::new(2).with_height(1));
        map.set(0, 1, Tile::new(9));
        map.set_tileset(Some(handle));

        let mut renderer = RecordingRenderer::new();
        let stats = map.render(&IsoProjection::default(), viewport(), &store, &mut renderer);
        assert_eq!(stats, TileRenderStats { visible: 4, drawn: 3 });
        assert_eq!(renderer.batches().len(), 1);

        let sprites: Vec<_> = renderer.sprites().copied().collect();
        assert_eq!(sprites[0].position, Vec2::ZERO);
        assert_eq!(sprites[0].origin, Vec2::new(0.5, 1.0));
        assert_eq!(sprites[0].size, Vec2::new(64.0, 32.0));
        // Raised tile (1, 1) sits at (0, 32) lifted by one tile height.
        assert_eq!(sprites[2].position, Vec2::new(0.0, 0.0));
        assert_eq!(sprites[2].region.u0, 0.5);
    }

    #[test]
    fn render_without_tileset_draws_nothing() {
        let map = filled(2, 2);
        let store = AtlasStore::new();
        let mut renderer = RecordingRenderer::new();
        let stats = map.render(&IsoProjection::default(), viewport(), &store, &mut renderer);
        assert_eq!(stats, TileRenderStats::default());
        assert!(renderer.batches().is_empty());
    }

    #[test]
    fn render_with_invalid_texture_draws_nothing() {
        let mut store = AtlasStore::new();
        let handle = store.insert("broken", SpriteAtlas::new());
        let mut map = filled(2, 2);
        map.set_tileset(Some(handle));
        let mut renderer = RecordingRenderer::new();
        map.render(&IsoProjection::default(), viewport(), &store, &mut renderer);
        assert_eq!(renderer.sprite_count(), 0);
    }
}
