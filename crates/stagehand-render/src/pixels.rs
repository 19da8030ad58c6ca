//! Pixel primitives: CPU-side RGBA images that can be uploaded as textures.

use std::any::Any;
use std::path::Path;

use glam::Vec4;
use image::{ImageFormat, RgbImage, RgbaImage};

use crate::error::PixelError;
use crate::primitive::Primitive;
use crate::textures::{Texture, TextureId, TextureStore};

/// Channel layout kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    Rgb,
    #[default]
    Rgba,
}

/// A 2D grid of RGBA pixels with an optional uploaded texture.
///
/// Pixels are stored as linear floats in [0, 1], row by row from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelPrimitive {
    width: u32,
    height: u32,
    channels: Channels,
    pixels: Vec<Vec4>,
    texture: Option<TextureId>,
}

fn to_byte(channel: f32) -> u8 {
    // clamped to [0, 255] before the cast
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl PixelPrimitive {
    /// Creates an opaque white image. Zero dimensions are raised to 1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            channels: Channels::Rgba,
            pixels: vec![Vec4::ONE; pixel_count(width, height)],
            texture: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Returns the texture this primitive was last uploaded to.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Sets the pixel at `(x, y)`. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Vec4) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = colour;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Replaces size and contents with the image at `path`.
    ///
    /// Only 3- and 4-channel images are accepted. On error the primitive is
    /// left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PixelError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| PixelError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let channels = match img.color().channel_count() {
            3 => Channels::Rgb,
            4 => Channels::Rgba,
            n => {
                return Err(PixelError::UnsupportedLayout {
                    path: path.to_path_buf(),
                    channels: n,
                })
            }
        };

        let rgba = img.to_rgba32f();
        self.width = rgba.width();
        self.height = rgba.height();
        self.channels = channels;
        self.pixels = rgba
            .as_raw()
            .chunks_exact(4)
            .map(|c| Vec4::new(c[0], c[1], c[2], c[3]))
            .collect();
        log::debug!(
            "loaded {}x{} {:?} pixels from {}",
            self.width,
            self.height,
            channels,
            path.display()
        );
        Ok(())
    }

    /// Writes the pixels to `path` as PNG, keeping the channel layout.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PixelError> {
        let path = path.as_ref();
        let invalid = || PixelError::InvalidImageData {
            path: path.to_path_buf(),
            width: self.width,
            height: self.height,
        };
        let write_err = |source| PixelError::Write {
            path: path.to_path_buf(),
            source,
        };

        match self.channels {
            Channels::Rgba => {
                let bytes: Vec<u8> = bytemuck::cast_slice(&self.to_rgba8()).to_vec();
                RgbaImage::from_raw(self.width, self.height, bytes)
                    .ok_or_else(invalid)?
                    .save_with_format(path, ImageFormat::Png)
                    .map_err(write_err)
            }
            Channels::Rgb => {
                let bytes: Vec<u8> = self
                    .to_rgba8()
                    .into_iter()
                    .flat_map(|[r, g, b, _]| [r, g, b])
                    .collect();
                RgbImage::from_raw(self.width, self.height, bytes)
                    .ok_or_else(invalid)?
                    .save_with_format(path, ImageFormat::Png)
                    .map_err(write_err)
            }
        }
    }

    /// Pushes the pixels to `store`, reusing this primitive's texture if it
    /// has one.
    pub fn upload(&mut self, store: &mut TextureStore) -> TextureId {
        let texture = Texture {
            width: self.width,
            height: self.height,
            data: bytemuck::cast_slice(&self.to_rgba8()).to_vec(),
        };
        let id = match self.texture {
            Some(id) if store.replace(id, texture.clone()) => id,
            _ => store.insert(texture),
        };
        self.texture = Some(id);
        id
    }

    /// Returns the pixels quantized to RGBA8.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels
            .iter()
            .map(|p| [to_byte(p.x), to_byte(p.y), to_byte(p.z), to_byte(p.w)])
            .collect()
    }
}

impl Default for PixelPrimitive {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Primitive for PixelPrimitive {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "PixelPrimitive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_is_opaque_white() {
        let pp = PixelPrimitive::new(1, 1);
        assert_eq!(pp.width(), 1);
        assert_eq!(pp.pixel(0, 0), Some(Vec4::ONE));
        assert_eq!(pp.pixel(1, 0), None);
        assert_eq!(PixelPrimitive::new(0, 0).height(), 1);
    }

    #[test]
    fn test_large_dimensions_do_not_overflow() {
        assert_eq!(pixel_count(u32::MAX, 2), 2 * u32::MAX as usize);

        // 70000 * 70000 does not fit in a u32; no pixel storage is needed to
        // exercise the index arithmetic
        let huge = PixelPrimitive {
            width: 70_000,
            height: 70_000,
            channels: Channels::Rgba,
            pixels: Vec::new(),
            texture: None,
        };
        assert_eq!(huge.index(69_999, 69_999), 70_000 * 70_000 - 1);
        assert_eq!(huge.pixel(69_999, 69_999), None);
    }

    #[test]
    fn test_upload_reuses_texture() {
        let mut store = TextureStore::new();
        let mut pp = PixelPrimitive::new(2, 1);
        let first = pp.upload(&mut store);
        pp.set_pixel(1, 0, Vec4::new(1.0, 0.0, 0.0, 1.0));
        let second = pp.upload(&mut store);
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(first).unwrap().data[4..8], [255, 0, 0, 255]);
    }

    #[test]
    fn test_rgb_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 2, image::Rgb([0, 128, 255]))
            .save(&path)
            .unwrap();

        let mut pp = PixelPrimitive::new(1, 1);
        pp.load(&path).unwrap();
        assert_eq!((pp.width(), pp.height()), (3, 2));
        assert_eq!(pp.channels(), Channels::Rgb);
        assert_eq!(pp.to_rgba8()[0], [0, 128, 255, 255]);

        let out = dir.path().join("out.png");
        pp.save(&out).unwrap();
        let reread = image::open(&out).unwrap();
        assert_eq!(reread.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_rgba_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 40]))
            .save(&path)
            .unwrap();

        let mut pp = PixelPrimitive::default();
        pp.load(&path).unwrap();
        assert_eq!(pp.channels(), Channels::Rgba);
        assert_eq!(pp.to_rgba8(), vec![[10, 20, 30, 40]]);
    }

    #[test]
    fn test_grayscale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        image::GrayImage::from_pixel(2, 2, image::Luma([7]))
            .save(&path)
            .unwrap();

        let mut pp = PixelPrimitive::new(1, 1);
        let err = pp.load(&path).unwrap_err();
        assert!(matches!(err, PixelError::UnsupportedLayout { channels: 1, .. }));
        assert_eq!(pp, PixelPrimitive::new(1, 1));
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"not a png").unwrap();
        let mut pp = PixelPrimitive::new(1, 1);
        assert!(matches!(pp.load(&path), Err(PixelError::Read { .. })));
    }

    proptest! {
        #[test]
        fn prop_bytes_survive_quantization(rgba in any::<[u8; 4]>(), x in 0u32..4, y in 0u32..3) {
            let mut pp = PixelPrimitive::new(4, 3);
            let colour = Vec4::from_array(rgba.map(|b| f32::from(b) / 255.0));
            pp.set_pixel(x, y, colour);
            prop_assert_eq!(pp.to_rgba8()[(y * 4 + x) as usize], rgba);
        }
    }
}
