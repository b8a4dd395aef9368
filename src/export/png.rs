//! PNG encoding for composed RGBA views.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, RgbaImage};
use thiserror::Error;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot encode an empty {0}x{1} image")]
    EmptyImage(u32, u32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngOptions {
    /// Fastest settings, for previews.
    pub fn fast() -> Self {
        Self {
            compression: CompressionType::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Encodes an 8-bit RGBA image as PNG bytes.
pub fn encode_png(img: &RgbaImage, options: &PngOptions) -> Result<Vec<u8>, ExportError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage(width, height));
    }

    let mut bytes = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut bytes, options.compression, options.filter);
    encoder.write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)?;
    Ok(bytes)
}
