//! Primitive file formats, chosen by file extension.

use std::collections::HashMap;
use std::path::Path;

use stagehand_core::{Result, StagehandError};

use crate::pixel_io::PixelPrimitiveIo;
use crate::primitive::Primitive;
use crate::textures::TextureStore;

/// A file format that can produce and serialize primitives.
pub trait PrimitiveFormat {
    /// Reads a primitive from `path`, uploading any pixel data to `store`.
    fn read(&self, path: &Path, store: &mut TextureStore) -> Result<Box<dyn Primitive>>;

    /// Writes `primitive` to `path`.
    ///
    /// Fails with [`StagehandError::IncompatiblePrimitive`] if this format
    /// cannot represent the primitive's kind.
    fn write(&self, path: &Path, primitive: &dyn Primitive) -> Result<()>;
}

/// Registry of primitive formats keyed by lowercase file extension.
pub struct PrimitiveIo {
    formats: HashMap<String, Box<dyn PrimitiveFormat>>,
}

impl Default for PrimitiveIo {
    fn default() -> Self {
        let mut io = Self {
            formats: HashMap::new(),
        };
        io.register("png", Box::new(PixelPrimitiveIo));
        io
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

impl PrimitiveIo {
    /// Creates a registry with the built-in formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `format` for `ext`, replacing any previous registration.
    pub fn register(&mut self, ext: &str, format: Box<dyn PrimitiveFormat>) {
        self.formats.insert(ext.to_lowercase(), format);
    }

    /// Returns true if a format is registered for `path`'s extension.
    pub fn supports(&self, path: impl AsRef<Path>) -> bool {
        self.formats.contains_key(&extension(path.as_ref()))
    }

    fn format_for(&self, path: &Path) -> Result<&dyn PrimitiveFormat> {
        let ext = extension(path);
        self.formats
            .get(&ext)
            .map(|f| f.as_ref())
            .ok_or(StagehandError::UnsupportedFormat(ext))
    }

    /// Reads a primitive using the format registered for the path's extension.
    pub fn read(
        &self,
        path: impl AsRef<Path>,
        store: &mut TextureStore,
    ) -> Result<Box<dyn Primitive>> {
        let path = path.as_ref();
        self.format_for(path)?.read(path, store)
    }

    /// Writes a primitive using the format registered for the path's extension.
    pub fn write(&self, path: impl AsRef<Path>, primitive: &dyn Primitive) -> Result<()> {
        let path = path.as_ref();
        self.format_for(path)?.write(path, primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelPrimitive;

    #[test]
    fn test_png_registered_case_insensitive() {
        let io = PrimitiveIo::new();
        assert!(io.supports("image.png"));
        assert!(io.supports("IMAGE.PNG"));
        assert!(!io.supports("model.obj"));
        assert!(!io.supports("no_extension"));
    }

    #[test]
    fn test_unknown_extension() {
        let io = PrimitiveIo::new();
        let err = io.write("scene.obj", &PixelPrimitive::default()).unwrap_err();
        assert!(matches!(err, StagehandError::UnsupportedFormat(ref ext) if ext == "obj"));
    }

    #[test]
    fn test_write_and_read_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.PNG");
        let io = PrimitiveIo::new();
        io.write(&path, &PixelPrimitive::new(3, 1)).unwrap();

        let mut store = TextureStore::new();
        let prim = io.read(&path, &mut store).unwrap();
        assert_eq!(prim.type_name(), "PixelPrimitive");
        assert_eq!(store.len(), 1);
    }
}
