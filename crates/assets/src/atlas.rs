use std::collections::HashMap;

use isoworks_common::{TextureHandle, TextureRegion};
use isoworks_render::{TextureFilter, TextureInfo, TextureLoader};
use serde::{Deserialize, Serialize};

/// Errors from atlas setup.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("texture creation failed for {width}x{height} atlas")]
    TextureCreation { width: u32, height: u32 },
}

/// A single named frame within an atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub name: String,
    pub region: TextureRegion,
    pub width: u32,
    pub height: u32,
}

/// Sequence of frame indices played at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frame_indices: Vec<usize>,
    /// Seconds per frame.
    pub frame_duration: f32,
    pub looping: bool,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frame_indices.len()
    }

    pub fn total_duration(&self) -> f32 {
        self.frame_count() as f32 * self.frame_duration
    }
}

/// Uniform grid slicing parameters. `None` columns/rows are derived from the texture size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub margin: u32,
}

impl GridLayout {
    pub fn cells(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            columns: None,
            rows: None,
            padding: 0,
            margin: 0,
        }
    }
}

/// One texture plus named frames and animations over it.
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    texture: TextureHandle,
    texture_width: u32,
    texture_height: u32,
    frames: Vec<SpriteFrame>,
    frame_by_name: HashMap<String, usize>,
    animations: HashMap<String, Animation>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already created texture.
    pub fn from_texture(texture: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            texture,
            texture_width: width,
            texture_height: height,
            ..Self::default()
        }
    }

    /// Upload RGBA8 pixels through the loader and wrap the resulting texture.
    pub fn load(
        loader: &mut dyn TextureLoader,
        pixels: &[u8],
        width: u32,
        height: u32,
        filter: TextureFilter,
    ) -> Result<Self, AtlasError> {
        let info = TextureInfo {
            width,
            height,
            filter,
        };
        let texture = loader.create_texture(pixels, &info);
        if !texture.is_valid() {
            return Err(AtlasError::TextureCreation { width, height });
        }
        tracing::debug!(texture = texture.0, width, height, "atlas texture loaded");
        Ok(Self::from_texture(texture, width, height))
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn texture_width(&self) -> u32 {
        self.texture_width
    }

    pub fn texture_height(&self) -> u32 {
        self.texture_height
    }

    pub fn is_valid(&self) -> bool {
        self.texture.is_valid()
    }

    /// Replace all frames with a uniform grid, named `frame_0`, `frame_1`, ... row-major.
    ///
    /// Explicit `columns`/`rows` are capped to cells that start inside the texture. Does
    /// nothing on an atlas without a valid texture or with a stride that overflows `u32`.
    pub fn define_grid(&mut self, layout: GridLayout) {
        if !self.is_valid() {
            return;
        }
        let (Some(stride_x), Some(stride_y)) = (
            layout.cell_width.checked_add(layout.padding),
            layout.cell_height.checked_add(layout.padding),
        ) else {
            tracing::debug!(?layout, "grid stride overflows, ignored");
            return;
        };
        if stride_x == 0 || stride_y == 0 {
            return;
        }
        let inset = layout.margin.saturating_mul(2);
        let usable_w = self.texture_width.saturating_sub(inset);
        let usable_h = self.texture_height.saturating_sub(inset);
        let columns = layout
            .columns
            .unwrap_or(usable_w.saturating_add(layout.padding) / stride_x)
            .min(cells_starting_inside(self.texture_width, layout.margin, stride_x));
        let rows = layout
            .rows
            .unwrap_or(usable_h.saturating_add(layout.padding) / stride_y)
            .min(cells_starting_inside(self.texture_height, layout.margin, stride_y));

        self.frames.clear();
        self.frame_by_name.clear();

        // Every origin is below the texture extent, so these cannot overflow.
        for row in 0..rows {
            for col in 0..columns {
                let x = layout.margin + col * stride_x;
                let y = layout.margin + row * stride_y;
                let name = format!("frame_{}", self.frames.len());
                self.push_frame(name, x, y, layout.cell_width, layout.cell_height);
            }
        }
        tracing::debug!(columns, rows, "atlas grid defined");
    }

    /// Add a named frame at a pixel rectangle. Does nothing without a valid texture.
    pub fn define_frame(&mut self, name: &str, x: u32, y: u32, width: u32, height: u32) {
        if !self.is_valid() {
            return;
        }
        self.push_frame(name.to_string(), x, y, width, height);
    }

    fn push_frame(&mut self, name: String, x: u32, y: u32, width: u32, height: u32) {
        let region = TextureRegion::from_pixels(
            self.texture,
            self.texture_width,
            self.texture_height,
            x,
            y,
            width,
            height,
        );
        self.frame_by_name.insert(name.clone(), self.frames.len());
        self.frames.push(SpriteFrame {
            name,
            region,
            width,
            height,
        });
    }

    /// Define an animation over the inclusive frame range `start..=end`.
    /// Indices outside the current frame list are skipped.
    pub fn define_animation_range(
        &mut self,
        name: &str,
        start: usize,
        end: usize,
        frame_duration: f32,
        looping: bool,
    ) {
        let frame_indices = match self.frames.len().checked_sub(1) {
            Some(last) if start <= last => (start..=end.min(last)).collect(),
            _ => Vec::new(),
        };
        self.insert_animation(name, frame_indices, frame_duration, looping);
    }

    /// Define an animation from frame names. Unknown names are skipped.
    pub fn define_animation_named<S: AsRef<str>>(
        &mut self,
        name: &str,
        frame_names: &[S],
        frame_duration: f32,
        looping: bool,
    ) {
        let frame_indices = frame_names
            .iter()
            .filter_map(|n| self.frame_index(n.as_ref()))
            .collect();
        self.insert_animation(name, frame_indices, frame_duration, looping);
    }

    fn insert_animation(
        &mut self,
        name: &str,
        frame_indices: Vec<usize>,
        frame_duration: f32,
        looping: bool,
    ) {
        self.animations.insert(
            name.to_string(),
            Animation {
                name: name.to_string(),
                frame_indices,
                frame_duration,
                looping,
            },
        );
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    pub fn frame_by_name(&self, name: &str) -> Option<&SpriteFrame> {
        self.frame_index(name).and_then(|i| self.frames.get(i))
    }

    pub fn frame_index(&self, name: &str) -> Option<usize> {
        self.frame_by_name.get(name).copied()
    }

    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Frame index shown by `anim_name` at `time` seconds.
    ///
    /// Looping animations wrap; non-looping ones clamp to their last frame. Unknown or
    /// empty animations yield index 0.
    pub fn animation_frame_index(&self, anim_name: &str, time: f32) -> usize {
        let Some(anim) = self.animation(anim_name) else {
            return 0;
        };
        let Some(&first) = anim.frame_indices.first() else {
            return 0;
        };
        let total = anim.total_duration();
        if total <= 0.0 || anim.frame_duration <= 0.0 {
            return first;
        }

        let t = if anim.looping {
            time.rem_euclid(total)
        } else {
            time.clamp(0.0, total - 0.0001)
        };
        let slot = ((t / anim.frame_duration) as usize).min(anim.frame_indices.len() - 1);
        anim.frame_indices[slot]
    }

    /// Texture region shown by `anim_name` at `time`; the whole texture if the frame is
    /// missing.
    pub fn animation_frame(&self, anim_name: &str, time: f32) -> TextureRegion {
        let idx = self.animation_frame_index(anim_name, time);
        self.frame(idx)
            .map(|f| f.region)
            .unwrap_or_else(|| TextureRegion::full(self.texture))
    }

    /// Release the texture and forget all frames and animations.
    pub fn unload(&mut self, loader: &mut dyn TextureLoader) {
        if self.texture.is_valid() {
            loader.destroy_texture(self.texture);
            self.texture = TextureHandle::INVALID;
        }
        self.frames.clear();
        self.frame_by_name.clear();
        self.animations.clear();
        self.texture_width = 0;
        self.texture_height = 0;
    }
}

/// Number of cells along one axis whose origin `margin + i * stride` lies inside `extent`.
fn cells_starting_inside(extent: u32, margin: u32, stride: u32) -> u32 {
    if margin >= extent {
        0
    } else {
        (extent - margin - 1) / stride + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoworks_render::HeadlessTextures;

    fn atlas_128x64() -> SpriteAtlas {
        SpriteAtlas::from_texture(TextureHandle(3), 128, 64)
    }

    #[test]
    fn grid_derives_columns_and_rows() {
        let mut atlas = atlas_128x64();
        atlas.define_grid(GridLayout::cells(32, 32));
        assert_eq!(atlas.frame_count(), 8);
        let f = atlas.frame_by_name("frame_5").unwrap();
        // Row 1, column 1.
        assert_eq!(f.region.u0, 0.25);
        assert_eq!(f.region.v0, 0.5);
        assert_eq!(f.width, 32);
    }

    #[test]
    fn grid_respects_padding_and_margin() {
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(1), 70, 36);
        atlas.define_grid(GridLayout {
            padding: 2,
            margin: 1,
            ..GridLayout::cells(32, 32)
        });
        assert_eq!(atlas.frame_count(), 2);
        let second = atlas.frame(1).unwrap();
        assert_eq!(second.region.u0, 35.0 / 70.0);
    }

    #[test]
    fn oversized_grid_values_are_neutral() {
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(1), 64, 64);
        atlas.define_grid(GridLayout {
            margin: 3_000_000_000,
            ..GridLayout::cells(8, 8)
        });
        assert_eq!(atlas.frame_count(), 0);

        atlas.define_frame("keep", 0, 0, 8, 8);
        atlas.define_grid(GridLayout {
            padding: 1,
            ..GridLayout::cells(u32::MAX, 8)
        });
        assert_eq!(atlas.frame_index("keep"), Some(0));
    }

    #[test]
    fn explicit_grid_counts_stop_at_texture_edge() {
        let mut atlas = atlas_128x64();
        atlas.define_grid(GridLayout {
            columns: Some(4_000_000_000),
            rows: Some(u32::MAX),
            ..GridLayout::cells(32, 32)
        });
        assert_eq!(atlas.frame_count(), 8);
    }

    #[test]
    fn grid_without_texture_is_ignored() {
        let mut atlas = SpriteAtlas::new();
        atlas.define_grid(GridLayout::cells(16, 16));
        atlas.define_frame("x", 0, 0, 4, 4);
        assert_eq!(atlas.frame_count(), 0);
    }

    #[test]
    fn animation_range_drops_invalid_indices() {
        let mut atlas = atlas_128x64();
        atlas.define_grid(GridLayout::cells(32, 32));
        atlas.define_animation_range("walk", 6, 12, 0.1, true);
        assert_eq!(atlas.animation("walk").unwrap().frame_indices, vec![6, 7]);
    }

    #[test]
    fn animation_range_is_bounded_by_frame_count() {
        let mut atlas = atlas_128x64();
        atlas.define_animation_range("none", 0, usize::MAX, 0.1, true);
        assert!(atlas.animation("none").unwrap().frame_indices.is_empty());

        atlas.define_grid(GridLayout::cells(32, 32));
        atlas.define_animation_range("all", 0, usize::MAX, 0.1, true);
        assert_eq!(atlas.animation("all").unwrap().frame_count(), 8);
        atlas.define_animation_range("past_end", 9, usize::MAX, 0.1, true);
        atlas.define_animation_range("reversed", 5, 2, 0.1, true);
        assert!(atlas.animation("past_end").unwrap().frame_indices.is_empty());
        assert!(atlas.animation("reversed").unwrap().frame_indices.is_empty());
    }

    #[test]
    fn animation_by_name_drops_unknown_frames() {
        let mut atlas = atlas_128x64();
        atlas.define_frame("idle", 0, 0, 32, 32);
        atlas.define_frame("blink", 32, 0, 32, 32);
        atlas.define_animation_named("idle", &["idle", "nope", "blink"], 0.2, false);
        let anim = atlas.animation("idle").unwrap();
        assert_eq!(anim.frame_indices, vec![0, 1]);
        assert!((anim.total_duration() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn frame_index_looping_wraps() {
        let mut atlas = atlas_128x64();
        atlas.define_grid(GridLayout::cells(32, 32));
        atlas.define_animation_range("spin", 0, 3, 0.25, true);
        assert_eq!(atlas.animation_frame_index("spin", 0.0), 0);
        assert_eq!(atlas.animation_frame_index("spin", 0.5), 2);
        assert_eq!(atlas.animation_frame_index("spin", 1.25), 1);
    }

    #[test]
    fn frame_index_non_looping_clamps_to_last() {
        let mut atlas = atlas_128x64();
        atlas.define_grid(GridLayout::cells(32, 32));
        atlas.define_animation_range("once", 2, 4, 0.25, false);
        assert_eq!(atlas.animation_frame_index("once", 0.75), 4);
        assert_eq!(atlas.animation_frame_index("once", 10.0), 4);
        assert_eq!(atlas.animation_frame_index("once", -1.0), 2);
    }

    #[test]
    fn unknown_animation_is_neutral() {
        let atlas = atlas_128x64();
        assert_eq!(atlas.animation_frame_index("missing", 1.0), 0);
        assert!(atlas.frame(99).is_none());
        assert!(atlas.frame_by_name("missing").is_none());
        assert_eq!(
            atlas.animation_frame("missing", 0.0),
            TextureRegion::full(TextureHandle(3))
        );
    }

    #[test]
    fn load_and_unload_through_loader() {
        let mut textures = HeadlessTextures::new();
        let pixels = vec![0u8; 8 * 8 * 4];
        let mut atlas =
            SpriteAtlas::load(&mut textures, &pixels, 8, 8, TextureFilter::Nearest).unwrap();
        assert!(atlas.is_valid());
        atlas.define_grid(GridLayout::cells(4, 4));
        assert_eq!(atlas.frame_count(), 4);

        atlas.unload(&mut textures);
        assert!(!atlas.is_valid());
        assert_eq!(atlas.frame_count(), 0);
        assert!(textures.is_empty());
    }

    #[test]
    fn load_failure_surfaces_as_error() {
        let mut textures = HeadlessTextures::new();
        let err = SpriteAtlas::load(&mut textures, &[], 8, 8, TextureFilter::Linear).unwrap_err();
        assert!(matches!(err, AtlasError::TextureCreation { width: 8, height: 8 }));
    }
}
