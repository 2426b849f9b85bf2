use std::collections::BTreeMap;
use std::fmt::Write as _;

use isoworks_common::TextureHandle;

use crate::renderer::{Renderer, Sprite, TextureInfo, TextureLoader};

/// Sprites submitted inside one `begin_batch`/`end_batch` bracket.
#[derive(Debug, Clone, Default)]
pub struct RecordedBatch {
    pub sprites: Vec<Sprite>,
}

/// Headless renderer that records every batch it receives.
///
/// Used by tests and the CLI in place of a GPU backend. Draw calls outside a batch are
/// counted as stray and otherwise dropped, matching what a real backend would do.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    batches: Vec<RecordedBatch>,
    open: Option<RecordedBatch>,
    stray_draws: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed batches, in submission order.
    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    /// Every sprite from every completed batch, flattened.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.batches.iter().flat_map(|b| b.sprites.iter())
    }

    pub fn sprite_count(&self) -> usize {
        self.batches.iter().map(|b| b.sprites.len()).sum()
    }

    pub fn stray_draws(&self) -> usize {
        self.stray_draws
    }

    pub fn is_batch_open(&self) -> bool {
        self.open.is_some()
    }

    /// Forget everything recorded so far (start of a new frame).
    pub fn clear(&mut self) {
        self.batches.clear();
        self.open = None;
        self.stray_draws = 0;
    }

    /// Human-readable dump of the recorded frame.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (batches={}, sprites={}, stray={}) ===",
            self.batches.len(),
            self.sprite_count(),
            self.stray_draws
        );
        for (i, batch) in self.batches.iter().enumerate() {
            let _ = writeln!(out, "batch {i}: {} sprites", batch.sprites.len());
            for s in &batch.sprites {
                let _ = writeln!(
                    out,
                    "  tex={} pos=({:.1}, {:.1}) size=({:.1}, {:.1})",
                    s.region.texture.0, s.position.x, s.position.y, s.size.x, s.size.y
                );
            }
        }
        out
    }
}

impl Renderer for RecordingRenderer {
    fn begin_batch(&mut self) {
        if let Some(unfinished) = self.open.take() {
            tracing::warn!("begin_batch while a batch was open; closing it");
            self.batches.push(unfinished);
        }
        self.open = Some(RecordedBatch::default());
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        match self.open.as_mut() {
            Some(batch) => batch.sprites.push(*sprite),
            None => self.stray_draws += 1,
        }
    }

    fn end_batch(&mut self) {
        if let Some(batch) = self.open.take() {
            self.batches.push(batch);
        }
    }
}

/// Headless texture arena: integer handles backed by an owning map.
///
/// Creation fails (returns the invalid handle) for empty dimensions or short pixel
/// buffers. Releasing an unknown or already released handle is a no-op.
#[derive(Debug)]
pub struct HeadlessTextures {
    textures: BTreeMap<TextureHandle, TextureInfo>,
    next_id: u32,
}

impl Default for HeadlessTextures {
    fn default() -> Self {
        Self {
            textures: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(&handle)
    }

    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureLoader for HeadlessTextures {
    fn create_texture(&mut self, pixels: &[u8], info: &TextureInfo) -> TextureHandle {
        if info.width == 0 || info.height == 0 || pixels.len() < info.byte_len() {
            tracing::warn!(
                width = info.width,
                height = info.height,
                bytes = pixels.len(),
                "rejecting texture with invalid pixel data"
            );
            return TextureHandle::INVALID;
        }
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.insert(handle, *info);
        tracing::debug!(handle = handle.0, "texture created");
        handle
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_none() {
            tracing::debug!(handle = handle.0, "ignoring release of unknown texture");
        }
    }
}
