//! Pixel I/O error types.

use std::path::PathBuf;

use stagehand_core::StagehandError;
use thiserror::Error;

/// Errors that can occur while loading or saving pixel data.
#[derive(Error, Debug)]
pub enum PixelError {
    /// The image file could not be opened or decoded.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image file could not be encoded or written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image is neither RGB nor RGBA.
    #[error("'{}' has {channels} channel(s), expected RGB or RGBA", path.display())]
    UnsupportedLayout { path: PathBuf, channels: u8 },

    /// The pixel buffer does not match the image dimensions.
    #[error("pixel buffer for '{}' does not match {width}x{height}", path.display())]
    InvalidImageData {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl From<PixelError> for StagehandError {
    fn from(err: PixelError) -> Self {
        match err {
            PixelError::Read { ref path, .. }
            | PixelError::Write { ref path, .. }
            | PixelError::InvalidImageData { ref path, .. } => {
                StagehandError::Io {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                }
            }
            PixelError::UnsupportedLayout { path, channels } => StagehandError::UnsupportedLayout {
                path: path.display().to_string(),
                channels,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_image_data_names_the_file() {
        let err = PixelError::InvalidImageData {
            path: PathBuf::from("shots/frame.png"),
            width: 4,
            height: 3,
        };
        match StagehandError::from(err) {
            StagehandError::Io { path, reason } => {
                assert_eq!(path, "shots/frame.png");
                assert!(reason.contains("shots/frame.png"), "{reason}");
                assert!(reason.contains("4x3"), "{reason}");
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
