pub const DEFAULT_QUALITY: u8 = 95;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Pause between consecutive saves during batch retrieval.
pub const DEFAULT_RETRIEVAL_DELAY_MS: u64 = 300;
/// Highest `(n)` suffix tried before a save gives up on finding a free name.
pub const MAX_NAME_SUFFIX: u32 = 999;

/// Maximum accepted payload (100MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 16384;
/// Largest width or height libwebp can encode.
pub const MAX_WEBP_DIMENSION: u32 = 16383;

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const OXIPNG_PRESET: u8 = 4;

pub const AVIF_ENCODER_SPEED: u8 = 6;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";
pub const PROGRESS_BAR_CHARS: &str = "#>-";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const CONVERTED_SIZE_PREFIX: &str = "📈 Converted size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
