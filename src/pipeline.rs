use crate::codec::ImageCodec;
use crate::convert::{convert_item, ConversionOptions};
use crate::error::SqueezeError;
use crate::model::{ConversionResult, SourceId, SourceItem};
use crate::progress::{Progress, ProgressReporter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A single item that could not be converted. The batch carries on without it.
#[derive(Debug)]
pub struct ConversionFailure {
    pub source_id: SourceId,
    pub display_name: String,
    pub error: SqueezeError,
}

/// Cooperative cancellation flag, checked before each item.
///
/// Clones share the same flag, so one can be handed to a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ConversionResult>,
    pub failures: Vec<ConversionFailure>,
    /// Items the pipeline actually reached (all of them unless cancelled).
    pub attempted: usize,
    pub progress: Progress,
    pub cancelled: bool,
}

/// Convert `items` one after another, in order.
///
/// Failures are recorded and skipped; progress is reported after every item
/// so it climbs monotonically to 100% whatever the per-item outcome.
pub fn run_batch<C: ImageCodec>(
    codec: &C,
    items: &[Arc<SourceItem>],
    options: &ConversionOptions,
    cancel: &CancelToken,
    reporter: &dyn ProgressReporter,
) -> BatchOutcome {
    let start_time = Instant::now();
    let mut outcome = BatchOutcome {
        progress: Progress::new(items.len()),
        ..Default::default()
    };

    info!(
        total = items.len(),
        quality = options.quality,
        format = %options.format,
        "starting batch conversion"
    );

    for item in items {
        if cancel.is_cancelled() {
            info!(
                processed = outcome.progress.processed,
                total = outcome.progress.total,
                "batch cancelled"
            );
            outcome.cancelled = true;
            break;
        }

        match convert_item(codec, item, options) {
            Ok(result) => {
                reporter.item_converted(&result);
                outcome.results.push(result);
            }
            Err(error) => {
                warn!(id = %item.id, file = %item.display_name, %error, "conversion failed");
                let failure = ConversionFailure {
                    source_id: item.id,
                    display_name: item.display_name.clone(),
                    error,
                };
                reporter.item_failed(&failure);
                outcome.failures.push(failure);
            }
        }

        outcome.attempted += 1;
        outcome.progress.processed += 1;
        reporter.update_progress(outcome.progress);
    }

    info!(
        converted = outcome.results.len(),
        failed = outcome.failures.len(),
        elapsed = ?start_time.elapsed(),
        "batch finished"
    );

    outcome
}
