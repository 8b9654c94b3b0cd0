//! Screenshot thumbnailing
//!
//! Shrinks a stored screenshot so it fits inside a bounding box, keeping the
//! aspect ratio and the original encoding format. Images that already fit are
//! left alone, nothing is ever enlarged.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageError, ImageFormat};
use tracing::debug;

use super::error::AssetError;

/// Formats a screenshot may be stored in.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Quality used when re-encoding JPEGs (1-100)
    pub jpeg_quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 300,
            max_height: 200,
            jpeg_quality: 85,
        }
    }
}

/// What processing did to an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub format: ImageFormat,
    pub original_width: u32,
    pub original_height: u32,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn resized(&self) -> bool {
        (self.width, self.height) != (self.original_width, self.original_height)
    }
}

/// A rendered thumbnail, `data` is `None` when the original can stay as is.
#[derive(Debug)]
pub struct Rendered {
    pub thumbnail: Thumbnail,
    pub data: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Default)]
pub struct ThumbnailProcessor {
    config: ThumbnailConfig,
}

impl ThumbnailProcessor {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    /// Size of the thumbnail for a `width` x `height` original.
    ///
    /// The scale factor is `min(max_w / w, max_h / h, 1.0)`.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (width, height);
        }
        let scale = (self.config.max_width as f64 / width as f64)
            .min(self.config.max_height as f64 / height as f64)
            .min(1.0);
        if scale >= 1.0 {
            return (width, height);
        }
        let scaled_width = ((width as f64) * scale).round() as u32;
        let scaled_height = ((height as f64) * scale).round() as u32;
        (
            scaled_width.clamp(1, self.config.max_width),
            scaled_height.clamp(1, self.config.max_height),
        )
    }

    /// Works out the encoding of `data`, falling back to the file extension
    /// when the content has no recognisable signature.
    pub fn detect_format(data: &[u8], extension: Option<&str>) -> Result<ImageFormat, AssetError> {
        let format = match image::guess_format(data) {
            Ok(format) => format,
            Err(_) => extension
                .map(|ext| ext.trim_start_matches('.'))
                .and_then(ImageFormat::from_extension)
                .ok_or_else(|| {
                    AssetError::UnsupportedFormat(format!(
                        "unrecognised image data (extension {extension:?})"
                    ))
                })?,
        };

        match SUPPORTED_FORMATS.contains(&format) {
            true => Ok(format),
            false => Err(AssetError::UnsupportedFormat(format!("{format:?}"))),
        }
    }

    /// Decode, shrink and re-encode `data` (blocking).
    ///
    /// Runs on the caller's thread, async callers should go through
    /// `spawn_blocking`.
    pub fn render(&self, data: &[u8], extension: Option<&str>) -> Result<Rendered, AssetError> {
        let format = Self::detect_format(data, extension)?;
        let img = image::load_from_memory_with_format(data, format).map_err(decode_error)?;

        let (original_width, original_height) = (img.width(), img.height());
        let (width, height) = self.target_dimensions(original_width, original_height);
        let thumbnail = Thumbnail {
            format,
            original_width,
            original_height,
            width,
            height,
        };

        if !thumbnail.resized() {
            debug!(
                width = original_width,
                height = original_height,
                "Image already within bounds"
            );
            return Ok(Rendered {
                thumbnail,
                data: None,
            });
        }

        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        let data = self.encode(&resized, format)?;

        debug!(
            original_width,
            original_height,
            width,
            height,
            size = data.len(),
            "Thumbnail generated"
        );

        Ok(Rendered {
            thumbnail,
            data: Some(data),
        })
    }

    /// Encode in `format`, converting pixels to something the encoder accepts.
    fn encode(&self, img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, AssetError> {
        let mut buf = Vec::new();
        let result = match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
                match img.color() {
                    ColorType::L8 | ColorType::Rgb8 => img.write_with_encoder(encoder),
                    _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder),
                }
            }
            ImageFormat::Png => match img.color() {
                ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(img.to_rgba8())
                    .write_to(&mut Cursor::new(&mut buf), format),
                _ => img.write_to(&mut Cursor::new(&mut buf), format),
            },
            _ => match img.color() {
                ColorType::Rgb8 | ColorType::Rgba8 => {
                    img.write_to(&mut Cursor::new(&mut buf), format)
                }
                _ => DynamicImage::ImageRgba8(img.to_rgba8())
                    .write_to(&mut Cursor::new(&mut buf), format),
            },
        };

        result.map_err(|err| match err {
            ImageError::Unsupported(err) => AssetError::UnsupportedFormat(err.to_string()),
            other => AssetError::Decode(format!("failed to encode {format:?}: {other}")),
        })?;
        Ok(buf)
    }
}

fn decode_error(err: ImageError) -> AssetError {
    match err {
        ImageError::Unsupported(err) => AssetError::UnsupportedFormat(err.to_string()),
        other => AssetError::Decode(other.to_string()),
    }
}
