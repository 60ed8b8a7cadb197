use crate::constants::{
    COMPRESSION_RATIO_PREFIX, CONVERTED_SIZE_PREFIX, ERROR_PREFIX, INFO_PREFIX,
    ORIGINAL_SIZE_PREFIX, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::formats::TargetFormat;
use crate::pipeline::ConversionFailure;
use crate::retrieval::RetrievalReport;
use crate::selection::Selection;
use crate::size::format_file_size;
use crate::stats::BatchStats;
use std::path::Path;
use std::time::Duration;

/// One-line description of the byte savings, e.g. "saved 1 MB".
pub fn describe_savings(savings: i64) -> String {
    let magnitude = format_file_size(savings.unsigned_abs());
    if savings >= 0 {
        format!("saved {}", magnitude)
    } else {
        format!("grew by {}", magnitude)
    }
}

pub fn print_batch_summary(stats: &BatchStats, failures: &[ConversionFailure], elapsed: Duration) {
    crate::status!("\n📊 Batch Conversion Summary:");
    crate::status!("  📁 Total files: {}", stats.total_files);
    crate::status!(
        "  {} {} ({} bytes)",
        ORIGINAL_SIZE_PREFIX,
        format_file_size(stats.total_original_size),
        stats.total_original_size
    );
    crate::status!(
        "  {} {} ({} bytes)",
        CONVERTED_SIZE_PREFIX,
        format_file_size(stats.total_converted_size),
        stats.total_converted_size
    );
    crate::status!("  {} {}%", COMPRESSION_RATIO_PREFIX, stats.compression_ratio);
    crate::status!("  💾 Total: {}", describe_savings(stats.total_savings));
    crate::status!("  ⏱️  Total time: {:?}", elapsed);

    if !failures.is_empty() {
        crate::status!("  {} Failed files: {}", WARNING_PREFIX, failures.len());
        for failure in failures {
            crate::status!("    {} {}: {}", ERROR_PREFIX, failure.display_name, failure.error);
        }
    }
}

pub fn print_retrieval_summary(report: &RetrievalReport, dir: &Path) {
    crate::status!(
        "{} Saved {} file(s) to {:?}",
        SUCCESS_PREFIX,
        report.saved.len(),
        dir
    );
    for failure in &report.failures {
        eprintln!("{} Could not save {}: {}", ERROR_PREFIX, failure.output_name, failure.error);
    }
}

pub fn print_scan(selection: &Selection, format: TargetFormat) {
    crate::status!("{} Target format: {} ({})", INFO_PREFIX, format, format.mime_type());

    let mut total = 0u64;
    for item in &selection.accepted {
        total += item.original_size;
        crate::status!(
            "  {} {} {} ({})",
            SUCCESS_PREFIX,
            item.id,
            item.display_name,
            format_file_size(item.original_size)
        );
    }
    for rejection in &selection.rejected {
        crate::status!("  ⏭️  {} - {}", rejection.name, rejection.reason);
    }

    crate::status!(
        "\n{} {} file(s) to convert, {} total; {} skipped",
        INFO_PREFIX,
        selection.accepted.len(),
        format_file_size(total),
        selection.rejected.len()
    );
}
