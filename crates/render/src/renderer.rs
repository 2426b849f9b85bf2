use glam::Vec2;
use isoworks_common::{Color, TextureHandle, TextureRegion};

/// One sprite draw command.
///
/// `origin` is normalized within the sprite: `(0.5, 0.5)` is the center, `(0.5, 1.0)`
/// the bottom-center used for isometric tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub size: Vec2,
    pub region: TextureRegion,
    pub tint: Color,
    /// Radians.
    pub rotation: f32,
    pub origin: Vec2,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(32.0, 32.0),
            region: TextureRegion::default(),
            tint: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::new(0.5, 0.5),
        }
    }
}

/// Sprite renderer collaborator. Implemented by the platform backend.
///
/// Draw calls are only valid between `begin_batch` and `end_batch`.
pub trait Renderer {
    fn begin_batch(&mut self);

    fn draw_sprite(&mut self, sprite: &Sprite);

    fn end_batch(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter {
    #[default]
    Nearest,
    Linear,
}

/// Pixel layout of a texture to create. Pixel data is tightly packed RGBA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
}

impl TextureInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: TextureFilter::default(),
        }
    }

    /// Number of bytes a tightly packed RGBA8 image of this size occupies.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Texture creation collaborator.
///
/// Failure is reported as `TextureHandle::INVALID`, never as a panic.
pub trait TextureLoader {
    fn create_texture(&mut self, pixels: &[u8], info: &TextureInfo) -> TextureHandle;

    fn destroy_texture(&mut self, handle: TextureHandle);
}
