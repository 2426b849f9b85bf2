//! Data-driven atlas layout, stored as JSON next to the atlas image.
//!
//! ```json
//! {
//!   "grid": { "cell_width": 32, "cell_height": 32 },
//!   "frames": [{ "name": "counter", "x": 0, "y": 64, "width": 64, "height": 48 }],
//!   "animations": [
//!     { "name": "walk", "frames": { "range": { "start": 0, "end": 3 } }, "frame_duration": 0.1 },
//!     { "name": "wave", "frames": { "names": ["frame_4", "frame_5"] }, "looping": false }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atlas::{AtlasError, GridLayout, SpriteAtlas};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationFrames {
    Range { start: usize, end: usize },
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    pub name: String,
    pub frames: AnimationFrames,
    #[serde(default = "default_frame_duration")]
    pub frame_duration: f32,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_frame_duration() -> f32 {
    0.1
}

fn default_looping() -> bool {
    true
}

/// Full atlas layout. The grid (if any) is applied first, then explicit frames are
/// appended, then animations are defined against the resulting frame list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    #[serde(default)]
    pub grid: Option<GridLayout>,
    #[serde(default)]
    pub frames: Vec<FrameDescriptor>,
    #[serde(default)]
    pub animations: Vec<AnimationDescriptor>,
}

impl AtlasDescriptor {
    pub fn from_json_str(text: &str) -> Result<Self, AtlasError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AtlasError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Define this layout's frames and animations on `atlas`.
    pub fn apply(&self, atlas: &mut SpriteAtlas) {
        if let Some(grid) = self.grid {
            atlas.define_grid(grid);
        }
        for f in &self.frames {
            atlas.define_frame(&f.name, f.x, f.y, f.width, f.height);
        }
        for a in &self.animations {
            match &a.frames {
                AnimationFrames::Range { start, end } => {
                    atlas.define_animation_range(&a.name, *start, *end, a.frame_duration, a.looping)
                }
                AnimationFrames::Names(names) => {
                    atlas.define_animation_named(&a.name, names, a.frame_duration, a.looping)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoworks_common::TextureHandle;

    const SAMPLE: &str = r#"{
        "grid": { "cell_width": 32, "cell_height": 32 },
        "frames": [{ "name": "counter", "x": 0, "y": 32, "width": 64, "height": 32 }],
        "animations": [
            { "name": "walk", "frames": { "range": { "start": 0, "end": 3 } } },
            { "name": "wave", "frames": { "names": ["frame_1", "counter"] }, "looping": false }
        ]
    }"#;

    #[test]
    fn parse_and_apply() {
        let desc = AtlasDescriptor::from_json_str(SAMPLE).unwrap();
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(1), 128, 64);
        desc.apply(&mut atlas);

        // 4x2 grid plus one explicit frame.
        assert_eq!(atlas.frame_count(), 9);
        assert_eq!(atlas.frame_index("counter"), Some(8));

        let walk = atlas.animation("walk").unwrap();
        assert!(walk.looping);
        assert_eq!(walk.frame_duration, 0.1);
        assert_eq!(walk.frame_indices, vec![0, 1, 2, 3]);

        let wave = atlas.animation("wave").unwrap();
        assert!(!wave.looping);
        assert_eq!(wave.frame_indices, vec![1, 8]);
    }

    #[test]
    fn out_of_range_layout_values_leave_atlas_neutral() {
        let desc = AtlasDescriptor::from_json_str(
            r#"{
                "grid": { "cell_width": 8, "cell_height": 8, "margin": 3000000000 },
                "animations": [
                    { "name": "all", "frames": { "range": { "start": 0, "end": 18446744073709551615 } } }
                ]
            }"#,
        )
        .unwrap();
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(1), 64, 64);
        desc.apply(&mut atlas);
        assert_eq!(atlas.frame_count(), 0);
        assert!(atlas.animation("all").unwrap().frame_indices.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = AtlasDescriptor::from_json_str("{ \"grid\": 5 }").unwrap_err();
        assert!(matches!(err, AtlasError::Json(_)));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let desc = AtlasDescriptor::from_json_str(SAMPLE).unwrap();
        desc.save(tmp.path()).unwrap();
        let loaded = AtlasDescriptor::load(tmp.path()).unwrap();
        assert_eq!(loaded, desc);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AtlasDescriptor::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AtlasError::Io(_)));
    }
}
