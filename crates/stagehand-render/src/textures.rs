//! Texture storage and the path-keyed texture cache.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PixelError;
use crate::pixels::PixelPrimitive;

/// Handle to a texture in a [`TextureStore`]. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Returns the raw handle value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

/// Uploaded RGBA8 pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub data: Vec<u8>,
}

/// Device-resident texture storage.
///
/// Handles are allocated monotonically and never reused.
#[derive(Debug)]
pub struct TextureStore {
    next_id: u32,
    textures: HashMap<TextureId, Texture>,
}

impl Default for TextureStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            textures: HashMap::new(),
        }
    }
}

impl TextureStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads a new texture and returns its handle.
    pub fn insert(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, texture);
        id
    }

    /// Replaces the contents of an existing texture.
    ///
    /// Returns `false` if the handle is unknown.
    pub fn replace(&mut self, id: TextureId, texture: Texture) -> bool {
        match self.textures.get_mut(&id) {
            Some(slot) => {
                *slot = texture;
                true
            }
            None => false,
        }
    }

    /// Gets a texture by handle.
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Releases a texture.
    pub fn remove(&mut self, id: TextureId) -> Option<Texture> {
        self.textures.remove(&id)
    }

    /// Returns the number of resident textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns true if no textures are resident.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Maps image paths to already-uploaded textures so repeated loads do not
/// touch the disk.
///
/// Entries never expire; only [`clear`](TextureCache::clear) evicts them.
/// The cache owns the textures it hands out: replacing or evicting an entry
/// removes its texture from the store.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<PathBuf, TextureId>,
}

impl TextureCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached texture for `path`, loading and uploading it on a miss.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        store: &mut TextureStore,
    ) -> Result<TextureId, PixelError> {
        let path = path.as_ref();
        if let Some(&id) = self.entries.get(path) {
            log::trace!("texture cache hit: {}", path.display());
            return Ok(id);
        }
        self.force_load(path, store)
    }

    /// Loads `path` from disk even if it is cached, replacing the cache entry.
    ///
    /// The reload gets a fresh handle and the superseded texture is released.
    /// On error the old entry stays cached.
    pub fn force_load(
        &mut self,
        path: impl AsRef<Path>,
        store: &mut TextureStore,
    ) -> Result<TextureId, PixelError> {
        let path = path.as_ref();
        let mut pixels = PixelPrimitive::new(1, 1);
        pixels.load(path)?;
        let id = pixels.upload(store);
        log::debug!("loaded {} as {id}", path.display());
        if let Some(old) = self.entries.insert(path.to_path_buf(), id) {
            store.remove(old);
        }
        Ok(id)
    }

    /// Returns the cached handle for `path` without loading.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<TextureId> {
        self.entries.get(path.as_ref()).copied()
    }

    /// Evicts every entry and releases its texture from `store`.
    pub fn clear(&mut self, store: &mut TextureStore) {
        log::debug!("clearing {} cached texture(s)", self.entries.len());
        for (_, id) in self.entries.drain() {
            store.remove(id);
        }
    }

    /// Returns the number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(2, 2, image::Rgb(rgb))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_store_ids_are_unique() {
        let mut store = TextureStore::new();
        let a = store.insert(Texture {
            width: 1,
            height: 1,
            data: vec![0; 4],
        });
        store.remove(a);
        let b = store.insert(Texture {
            width: 1,
            height: 1,
            data: vec![0; 4],
        });
        assert_ne!(a, b);
        assert_eq!(store.len(), 1);
        assert!(!store.replace(a, Texture { width: 1, height: 1, data: vec![1; 4] }));
    }

    #[test]
    fn test_cache_hit_returns_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", [255, 0, 0]);
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();

        let first = cache.load(&path, &mut store).unwrap();
        // a hit never touches the disk
        std::fs::remove_file(&path).unwrap();
        let second = cache.load(&path, &mut store).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "green.png", [0, 255, 0]);
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();

        let before = cache.load(&path, &mut store).unwrap();
        cache.clear(&mut store);
        assert!(cache.is_empty());
        assert!(store.get(before).is_none());
        let after = cache.load(&path, &mut store).unwrap();
        assert_ne!(before, after);
        assert_eq!(store.get(after).unwrap().data[..4], [0, 255, 0, 255]);
    }

    #[test]
    fn test_force_load_refreshes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "swap.png", [0, 0, 255]);
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();

        let old = cache.load(&path, &mut store).unwrap();
        write_png(dir.path(), "swap.png", [255, 255, 0]);
        let new = cache.force_load(&path, &mut store).unwrap();
        assert_ne!(old, new);
        assert_eq!(cache.get(&path), Some(new));
        assert_eq!(store.get(new).unwrap().data[..4], [255, 255, 0, 255]);
        assert!(store.get(old).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reloads_do_not_grow_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "loop.png", [9, 9, 9]);
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();

        for _ in 0..100 {
            cache.force_load(&path, &mut store).unwrap();
            cache.clear(&mut store);
            cache.load(&path, &mut store).unwrap();
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_force_load_keeps_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "keep.png", [1, 2, 3]);
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();

        let id = cache.load(&path, &mut store).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(cache.force_load(&path, &mut store).is_err());
        assert_eq!(cache.get(&path), Some(id));
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TextureStore::new();
        let mut cache = TextureCache::new();
        let err = cache
            .load(dir.path().join("nope.png"), &mut store)
            .unwrap_err();
        assert!(matches!(err, PixelError::Read { .. }));
        assert!(cache.is_empty());
        assert!(store.is_empty());
    }
}
