use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque texture handle issued by a texture loader. `0` means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// The four corners in order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Vec2; 4] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            max,
        ]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// A UV sub-rectangle of a texture.
///
/// `u0/v0` is the top-left corner, `u1/v1` the bottom-right. Flipping a sprite is
/// expressed by swapping the pair on the flipped axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRegion {
    pub texture: TextureHandle,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl TextureRegion {
    /// The whole texture.
    pub fn full(texture: TextureHandle) -> Self {
        Self {
            texture,
            u0: 0.0,
            v0: 0.0,
            u1: 1.0,
            v1: 1.0,
        }
    }

    /// Build a region from a pixel rectangle inside a texture of the given size.
    ///
    /// A zero-sized texture yields the full region rather than dividing by zero.
    pub fn from_pixels(
        texture: TextureHandle,
        tex_width: u32,
        tex_height: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Self {
        if tex_width == 0 || tex_height == 0 {
            return Self::full(texture);
        }
        let tw = tex_width as f32;
        let th = tex_height as f32;
        Self {
            texture,
            u0: x as f32 / tw,
            v0: y as f32 / th,
            u1: x.saturating_add(width) as f32 / tw,
            v1: y.saturating_add(height) as f32 / th,
        }
    }

    pub fn flipped(mut self, flip_x: bool, flip_y: bool) -> Self {
        if flip_x {
            std::mem::swap(&mut self.u0, &mut self.u1);
        }
        if flip_y {
            std::mem::swap(&mut self.v0, &mut self.v1);
        }
        self
    }
}

impl Default for TextureRegion {
    fn default() -> Self {
        Self::full(TextureHandle::INVALID)
    }
}
