use std::collections::{BTreeMap, HashMap};

use isoworks_render::TextureLoader;
use serde::{Deserialize, Serialize};

use crate::atlas::SpriteAtlas;

/// Handle to an atlas held by an [`AtlasStore`]. `0` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtlasHandle(pub u32);

#[derive(Debug)]
struct AtlasEntry {
    name: String,
    atlas: SpriteAtlas,
}

/// Owning arena of sprite atlases addressed by handle or by name.
///
/// Handles are never reused. Registering a second atlas under an existing name points
/// the name at the newest atlas; the older one stays reachable by handle until released.
#[derive(Debug)]
pub struct AtlasStore {
    atlases: BTreeMap<AtlasHandle, AtlasEntry>,
    by_name: HashMap<String, AtlasHandle>,
    next_id: u32,
}

impl Default for AtlasStore {
    fn default() -> Self {
        Self {
            atlases: BTreeMap::new(),
            by_name: HashMap::new(),
            next_id: 1,
        }
    }
}

impl AtlasStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `atlas` and return its handle.
    pub fn insert(&mut self, name: &str, atlas: SpriteAtlas) -> AtlasHandle {
        let handle = AtlasHandle(self.next_id);
        self.next_id += 1;
        self.atlases.insert(
            handle,
            AtlasEntry {
                name: name.to_string(),
                atlas,
            },
        );
        self.by_name.insert(name.to_string(), handle);
        tracing::debug!(handle = handle.0, name, "atlas registered");
        handle
    }

    pub fn get(&self, handle: AtlasHandle) -> Option<&SpriteAtlas> {
        self.atlases.get(&handle).map(|e| &e.atlas)
    }

    pub fn get_mut(&mut self, handle: AtlasHandle) -> Option<&mut SpriteAtlas> {
        self.atlases.get_mut(&handle).map(|e| &mut e.atlas)
    }

    pub fn handle_of(&self, name: &str) -> Option<AtlasHandle> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SpriteAtlas> {
        self.handle_of(name).and_then(|h| self.get(h))
    }

    pub fn name_of(&self, handle: AtlasHandle) -> Option<&str> {
        self.atlases.get(&handle).map(|e| e.name.as_str())
    }

    pub fn contains(&self, handle: AtlasHandle) -> bool {
        self.atlases.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    /// Unload and drop one atlas. Returns false (and does nothing) for an unknown or
    /// already released handle.
    pub fn release(&mut self, handle: AtlasHandle, loader: &mut dyn TextureLoader) -> bool {
        let Some(mut entry) = self.atlases.remove(&handle) else {
            tracing::debug!(handle = handle.0, "ignoring release of unknown atlas");
            return false;
        };
        if self.by_name.get(&entry.name) == Some(&handle) {
            self.by_name.remove(&entry.name);
        }
        entry.atlas.unload(loader);
        tracing::debug!(handle = handle.0, name = %entry.name, "atlas released");
        true
    }

    /// Unload every atlas.
    pub fn release_all(&mut self, loader: &mut dyn TextureLoader) {
        for (_, mut entry) in std::mem::take(&mut self.atlases) {
            entry.atlas.unload(loader);
        }
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoworks_render::{HeadlessTextures, TextureFilter};

    fn loaded_atlas(textures: &mut HeadlessTextures) -> SpriteAtlas {
        SpriteAtlas::load(textures, &[0u8; 64], 4, 4, TextureFilter::Nearest).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut textures = HeadlessTextures::new();
        let mut store = AtlasStore::new();
        let h = store.insert("tiles", loaded_atlas(&mut textures));
        assert_eq!(h, AtlasHandle(1));
        assert!(store.get(h).is_some());
        assert_eq!(store.handle_of("tiles"), Some(h));
        assert_eq!(store.name_of(h), Some("tiles"));
        assert!(store.get_by_name("nope").is_none());
    }

    #[test]
    fn release_unloads_texture_and_is_idempotent() {
        let mut textures = HeadlessTextures::new();
        let mut store = AtlasStore::new();
        let h = store.insert("tiles", loaded_atlas(&mut textures));
        assert_eq!(textures.len(), 1);

        assert!(store.release(h, &mut textures));
        assert!(textures.is_empty());
        assert!(store.get(h).is_none());
        assert!(store.handle_of("tiles").is_none());

        assert!(!store.release(h, &mut textures));
    }

    #[test]
    fn handles_are_never_reused() {
        let mut textures = HeadlessTextures::new();
        let mut store = AtlasStore::new();
        let a = store.insert("a", loaded_atlas(&mut textures));
        store.release(a, &mut textures);
        let b = store.insert("a", loaded_atlas(&mut textures));
        assert_ne!(a, b);
    }

    #[test]
    fn same_name_points_at_newest() {
        let mut textures = HeadlessTextures::new();
        let mut store = AtlasStore::new();
        let old = store.insert("ui", loaded_atlas(&mut textures));
        let new = store.insert("ui", loaded_atlas(&mut textures));
        assert_eq!(store.handle_of("ui"), Some(new));

        // Releasing the shadowed atlas keeps the name binding intact.
        store.release(old, &mut textures);
        assert_eq!(store.handle_of("ui"), Some(new));
    }

    #[test]
    fn release_all_empties_store() {
        let mut textures = HeadlessTextures::new();
        let mut store = AtlasStore::new();
        store.insert("a", loaded_atlas(&mut textures));
        store.insert("b", loaded_atlas(&mut textures));
        store.release_all(&mut textures);
        assert!(store.is_empty());
        assert!(textures.is_empty());
    }
}
