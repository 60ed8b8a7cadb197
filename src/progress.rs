use crate::constants::{ERROR_PREFIX, PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE, SUCCESS_PREFIX};
use crate::model::ConversionResult;
use crate::pipeline::ConversionFailure;
use crate::size::format_file_size;
use crate::stats::BatchStats;
use indicatif::{ProgressBar, ProgressStyle};

/// Items processed so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self { processed: 0, total }
    }

    /// Fraction in `[0.0, 1.0]`; exactly `1.0` once every item is processed.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.processed == self.total
    }
}

/// Receives batch events. Lets different front ends render their own display.
pub trait ProgressReporter {
    fn start_batch(&self, _total: usize) {}

    fn item_converted(&self, _result: &ConversionResult) {}

    fn item_failed(&self, _failure: &ConversionFailure) {}

    /// Called after every item, successful or not.
    fn update_progress(&self, progress: Progress);

    fn finish_batch(&self, _stats: &BatchStats) {}

    fn batch_cancelled(&self, _progress: Progress) {}
}

/// A no-op progress reporter for when progress reporting is not needed
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn update_progress(&self, _progress: Progress) {}
}

/// Console progress bar using indicatif.
///
/// Per-file lines go above the bar on a terminal. When the bar cannot draw
/// (output piped or redirected) they are printed directly instead.
pub struct ConsoleProgressReporter {
    bar: ProgressBar,
}

impl Default for ConsoleProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// A reporter that draws nothing, for quiet mode.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(PROGRESS_BAR_CHARS);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn start_batch(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("Converting images...");
    }

    fn item_converted(&self, result: &ConversionResult) {
        let line = converted_line(result);
        if self.bar.is_hidden() {
            crate::status!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    fn item_failed(&self, failure: &ConversionFailure) {
        let line = failed_line(failure);
        if !self.bar.is_hidden() {
            self.bar.println(line);
        } else if !crate::logger::is_quiet() {
            eprintln!("{}", line);
        }
    }

    fn update_progress(&self, progress: Progress) {
        self.bar.set_position(progress.processed as u64);
    }

    fn finish_batch(&self, _stats: &BatchStats) {
        self.bar.finish_with_message("✅ Conversion complete");
    }

    fn batch_cancelled(&self, progress: Progress) {
        self.bar.abandon_with_message(format!(
            "⚠️  Cancelled after {}/{} files",
            progress.processed, progress.total
        ));
    }
}

fn converted_line(result: &ConversionResult) -> String {
    format!(
        "{} {} -> {} ({} → {}, {}%)",
        SUCCESS_PREFIX,
        result.source().display_name,
        result.output_name(),
        format_file_size(result.original_size()),
        format_file_size(result.converted_size()),
        result.compression_ratio()
    )
}

fn failed_line(failure: &ConversionFailure) -> String {
    format!(
        "{} Failed to convert {}: {}",
        ERROR_PREFIX, failure.display_name, failure.error
    )
}
