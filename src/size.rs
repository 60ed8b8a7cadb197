//! Size formatting and compression-ratio helpers.
//!
//! Sizes are `u64` bytes everywhere; floating point only appears at the
//! display boundary.

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string with at most two decimals (e.g. "1.5 KB", "512 Bytes")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    // f64's Display drops trailing zeros, so 1.50 prints as "1.5"
    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit_index])
}

/// Calculate compression ratio as a percentage
///
/// # Arguments
/// * `original_size` - Original size in bytes
/// * `converted_size` - Converted size in bytes
///
/// # Returns
/// * Compression ratio as percentage (positive means reduction, negative means increase).
///   Returns `0.0` when `original_size` is zero.
pub fn calculate_compression_ratio(original_size: u64, converted_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - converted_size as f64) / original_size as f64) * 100.0
}

/// Render a ratio with exactly one decimal digit.
pub fn format_ratio(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "0.0".to_string();
    }
    format!("{:.1}", ratio)
}

pub fn compression_ratio_string(original_size: u64, converted_size: u64) -> String {
    format_ratio(calculate_compression_ratio(original_size, converted_size))
}

/// Signed byte savings; negative when the output grew.
pub fn savings(original_size: u64, converted_size: u64) -> i64 {
    original_size as i64 - converted_size as i64
}
