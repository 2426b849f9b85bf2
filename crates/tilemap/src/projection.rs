use glam::{IVec2, Vec2};

/// Height levels are weighted so any raised tile sorts after every flat tile.
const HEIGHT_DEPTH_WEIGHT: i32 = 1000;

/// Diamond isometric projection with a camera offset.
///
/// `sx = (tx - ty) * w/2 - cam.x`, `sy = (tx + ty) * h/2 - cam.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    tile_width: f32,
    tile_height: f32,
    camera: Vec2,
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 32.0,
            camera: Vec2::ZERO,
        }
    }
}

impl IsoProjection {
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            camera: Vec2::ZERO,
        }
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    pub fn set_tile_size(&mut self, tile_width: f32, tile_height: f32) {
        self.tile_width = tile_width;
        self.tile_height = tile_height;
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera += delta;
    }

    /// Back to 64x32 tiles and a camera at the origin.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tile_to_screen(&self, tile: Vec2) -> Vec2 {
        let half_w = self.tile_width * 0.5;
        let half_h = self.tile_height * 0.5;
        Vec2::new(
            (tile.x - tile.y) * half_w - self.camera.x,
            (tile.x + tile.y) * half_h - self.camera.y,
        )
    }

    pub fn tile_to_screen_i(&self, x: i32, y: i32) -> Vec2 {
        self.tile_to_screen(Vec2::new(x as f32, y as f32))
    }

    pub fn screen_to_tile(&self, screen: Vec2) -> Vec2 {
        let s = screen + self.camera;
        let half_w = self.tile_width * 0.5;
        let half_h = self.tile_height * 0.5;
        Vec2::new(
            (s.x / half_w + s.y / half_h) * 0.5,
            (s.y / half_h - s.x / half_w) * 0.5,
        )
    }

    /// Tile containing the screen point.
    pub fn screen_to_tile_int(&self, screen: Vec2) -> IVec2 {
        self.screen_to_tile(screen).floor().as_ivec2()
    }

    /// Higher depth draws later.
    pub fn tile_depth(x: i32, y: i32) -> i32 {
        x.saturating_add(y)
    }

    /// Saturates instead of wrapping for out-of-range heights.
    pub fn depth_key(x: i32, y: i32, height: i32) -> i32 {
        Self::tile_depth(x, y).saturating_add(height.saturating_mul(HEIGHT_DEPTH_WEIGHT))
    }
}
