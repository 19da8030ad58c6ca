//! Reading and writing pixel primitives as image files.

use std::path::Path;

use stagehand_core::{Result, StagehandError};

use crate::formats::PrimitiveFormat;
use crate::pixels::PixelPrimitive;
use crate::primitive::Primitive;
use crate::textures::TextureStore;

/// PNG (RGB or RGBA) format for [`PixelPrimitive`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelPrimitiveIo;

impl PixelPrimitiveIo {
    /// Loads `path` into a new pixel primitive and uploads it to `store`.
    pub fn read_pixels(path: &Path, store: &mut TextureStore) -> Result<PixelPrimitive> {
        let mut pp = PixelPrimitive::new(1, 1);
        pp.load(path)?;
        pp.upload(store);
        Ok(pp)
    }
}

impl PrimitiveFormat for PixelPrimitiveIo {
    fn read(&self, path: &Path, store: &mut TextureStore) -> Result<Box<dyn Primitive>> {
        Ok(Box::new(Self::read_pixels(path, store)?))
    }

    fn write(&self, path: &Path, primitive: &dyn Primitive) -> Result<()> {
        let pp = primitive
            .as_any()
            .downcast_ref::<PixelPrimitive>()
            .ok_or(StagehandError::IncompatiblePrimitive {
                expected: "PixelPrimitive",
                found: primitive.type_name(),
            })?;
        pp.save(path)?;
        Ok(())
    }
}
