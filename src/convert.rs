use crate::codec::ImageCodec;
use crate::constants::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{Result, SqueezeError};
use crate::formats::{extension_of, TargetFormat};
use crate::model::{ConversionResult, SourceItem};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    pub quality: u8,
    pub format: TargetFormat,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            format: TargetFormat::default(),
        }
    }
}

impl ConversionOptions {
    pub fn new(quality: Option<u8>, format: Option<&str>) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        validate_quality(quality)?;

        let format = match format {
            Some(name) => TargetFormat::from_str(name)?,
            None => TargetFormat::default(),
        };

        Ok(Self { quality, format })
    }

    /// Quality scaled to the codec's `[0.0, 1.0]` range.
    pub fn quality_fraction(&self) -> f32 {
        self.quality as f32 / 100.0
    }
}

pub fn validate_quality(quality: u8) -> Result<()> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(SqueezeError::InvalidQuality(quality));
    }
    Ok(())
}

/// Derive the output file name by replacing the text after the final `.`
/// with the target extension. Names without an extension get one appended.
pub fn output_name_for(name: &str, format: TargetFormat) -> String {
    let stem = match extension_of(name) {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name.strip_suffix('.').unwrap_or(name),
    };
    format!("{}.{}", stem, format.extension())
}

/// Convert one source item: decode -> encode -> measure.
///
/// # Arguments
/// * `codec` - Decoder/encoder doing the pixel work
/// * `item` - The accepted source image
/// * `options` - Quality and target format
///
/// # Returns
/// * `Ok(ConversionResult)` - Encoded payload with size metrics
/// * `Err(SqueezeError)` - If decoding fails or the encoder yields no output
pub fn convert_item<C: ImageCodec>(
    codec: &C,
    item: &Arc<SourceItem>,
    options: &ConversionOptions,
) -> Result<ConversionResult> {
    let encoded = {
        let surface = codec.decode(&item.payload)?;
        codec.encode(&surface, options.format, options.quality_fraction())?
        // surface dropped here, before the result is assembled
    };

    if encoded.is_empty() {
        return Err(SqueezeError::EmptyOutput(item.display_name.clone()));
    }

    let output_name = output_name_for(&item.display_name, options.format);
    Ok(ConversionResult::new(item.clone(), encoded, output_name))
}
