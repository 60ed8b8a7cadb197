use crate::constants::{
    AVIF_ENCODER_SPEED, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_FILE_SIZE,
    MAX_IMAGE_DIMENSION, MAX_WEBP_DIMENSION, OXIPNG_PRESET, ZOPFLI_ITERATIONS,
};
use crate::error::{Result, SqueezeError};
use crate::formats::TargetFormat;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use oxipng::{Deflaters, Options};
use std::io::Cursor;
use std::num::NonZeroU8;

/// Decoder/encoder pair the converter delegates pixel work to.
///
/// `quality` passed to [`ImageCodec::encode`] is a fraction in `[0.0, 1.0]`.
pub trait ImageCodec {
    /// Decoded pixel surface.
    type Surface;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Surface>;

    fn encode(&self, surface: &Self::Surface, format: TargetFormat, quality: f32)
        -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate, with lossy WebP from `webp` and PNG
/// post-optimisation from `oxipng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for RasterCodec {
    type Surface = DynamicImage;

    /// # Security
    /// - Enforces the maximum payload size before decoding
    /// - Rejects images whose dimensions exceed the limit
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        let len = bytes.len() as u64;
        if len > MAX_FILE_SIZE {
            return Err(SqueezeError::FileTooLarge(len, MAX_FILE_SIZE));
        }

        let img = image::load_from_memory(bytes)?;

        let (width, height) = img.dimensions();
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(SqueezeError::InvalidDimensions(
                width,
                height,
                MAX_IMAGE_DIMENSION,
            ));
        }

        Ok(img)
    }

    fn encode(&self, img: &DynamicImage, format: TargetFormat, quality: f32) -> Result<Vec<u8>> {
        let quality = quality.clamp(0.0, 1.0);

        let bytes = match format {
            TargetFormat::WebP => encode_webp(img, quality)?,
            TargetFormat::Jpeg => {
                let mut buf = Vec::new();
                let encoder = JpegEncoder::new_with_quality(&mut buf, percent(quality));
                // JPEG has no alpha channel
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
                buf
            }
            TargetFormat::Avif => {
                let mut buf = Vec::new();
                let encoder = AvifEncoder::new_with_speed_quality(
                    &mut buf,
                    AVIF_ENCODER_SPEED,
                    percent(quality),
                );
                DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)?;
                buf
            }
            TargetFormat::Png => encode_png(img, quality)?,
        };

        if bytes.is_empty() {
            return Err(SqueezeError::EmptyOutput(format.to_string()));
        }
        Ok(bytes)
    }
}

/// Scale a `[0.0, 1.0]` fraction to an integer quality in `[1, 100]`.
fn percent(quality: f32) -> u8 {
    ((quality * 100.0).round() as u8).clamp(1, 100)
}

fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width > MAX_WEBP_DIMENSION || height > MAX_WEBP_DIMENSION {
        return Err(SqueezeError::InvalidDimensions(
            width,
            height,
            MAX_WEBP_DIMENSION,
        ));
    }

    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
    // libwebp takes 0..=100
    let memory = encoder
        .encode_simple(false, quality * 100.0)
        .map_err(|e| {
            SqueezeError::Encoding(TargetFormat::WebP.to_string(), format!("{:?}", e))
        })?;
    Ok(memory.to_vec())
}

fn encode_png(img: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)?;
    let raw = cursor.into_inner();

    let mut options = Options::from_preset(OXIPNG_PRESET);

    // Higher quality buys more deflate effort; PNG output stays lossless
    let quality = percent(quality);
    options.deflate = if quality >= 90 {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= 70 {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };

    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| SqueezeError::PngOptimization(e.to_string()))
}
