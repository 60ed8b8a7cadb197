use crate::codec::ImageCodec;
use crate::convert::{validate_quality, ConversionOptions};
use crate::error::Result;
use crate::model::{ConversionResult, SourceId, SourceItem};
use crate::pipeline::{run_batch, CancelToken, ConversionFailure};
use crate::progress::{Progress, ProgressReporter};
use crate::selection::{accept_candidates, CandidateFile, IdAllocator, Selection};
use crate::stats::BatchStats;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
}

/// Read-only view of one working-set entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: SourceId,
    pub display_name: String,
    pub original_size: u64,
    pub converted_size: Option<u64>,
    pub compression_ratio: Option<String>,
}

/// Everything a front end needs to render the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: BatchState,
    pub items: Vec<ItemView>,
    pub progress: Progress,
    pub stats: Option<BatchStats>,
    pub converted: usize,
    pub failed: usize,
}

/// Owns the working set, results and batch state for one session.
pub struct Session<C: ImageCodec> {
    codec: C,
    options: ConversionOptions,
    ids: IdAllocator,
    working_set: Vec<Arc<SourceItem>>,
    results: Vec<ConversionResult>,
    failures: Vec<ConversionFailure>,
    progress: Progress,
    stats: Option<BatchStats>,
    state: BatchState,
    cancel: CancelToken,
}

impl<C: ImageCodec> Session<C> {
    pub fn new(codec: C, options: ConversionOptions) -> Self {
        Self {
            codec,
            options,
            ids: IdAllocator::new(),
            working_set: Vec::new(),
            results: Vec::new(),
            failures: Vec::new(),
            progress: Progress::default(),
            stats: None,
            state: BatchState::Idle,
            cancel: CancelToken::new(),
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Change the quality used by the next batch.
    pub fn set_quality(&mut self, quality: u8) -> Result<()> {
        validate_quality(quality)?;
        self.options.quality = quality;
        Ok(())
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Token that stops a running batch before its next item.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Filter `candidates` and append the accepted ones to the working set.
    ///
    /// Returns the selection so callers can show what was dropped.
    pub fn add_files(&mut self, candidates: Vec<CandidateFile>) -> Selection {
        let selection = accept_candidates(candidates, self.options.format, &mut self.ids);
        debug!(
            accepted = selection.accepted.len(),
            rejected = selection.rejected.len(),
            "files added"
        );
        self.working_set.extend(selection.accepted.iter().cloned());
        selection
    }

    /// Remove an item and any result or failure derived from it.
    ///
    /// When the item was part of the last batch, progress and stats are
    /// recomputed over what remains.
    pub fn remove(&mut self, id: SourceId) -> bool {
        let Some(index) = self.working_set.iter().position(|item| item.id == id) else {
            return false;
        };
        let item = self.working_set.remove(index);

        let before = self.results.len() + self.failures.len();
        self.results.retain(|result| !result.is_derived_from(&item));
        self.failures.retain(|failure| failure.source_id != item.id);
        if self.results.len() + self.failures.len() == before {
            return true;
        }

        self.progress.processed = self.progress.processed.saturating_sub(1);
        self.progress.total = self.progress.total.saturating_sub(1);
        if let Some(total_files) = self.stats.as_ref().map(|stats| stats.total_files) {
            let attempted = total_files.saturating_sub(1);
            self.stats = Some(BatchStats::aggregate(attempted, &self.results));
        }
        true
    }

    /// Empty the working set and forget all results.
    pub fn clear(&mut self) {
        self.working_set.clear();
        self.results.clear();
        self.failures.clear();
        self.progress = Progress::default();
        self.stats = None;
        self.state = BatchState::Idle;
    }

    pub fn items(&self) -> &[Arc<SourceItem>] {
        &self.working_set
    }

    pub fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    pub fn failures(&self) -> &[ConversionFailure] {
        &self.failures
    }

    pub fn stats(&self) -> Option<&BatchStats> {
        self.stats.as_ref()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// The result converted from exactly this item, if any.
    pub fn result_for(&self, item: &Arc<SourceItem>) -> Option<&ConversionResult> {
        self.results.iter().find(|result| result.is_derived_from(item))
    }

    /// Convert the whole working set.
    ///
    /// A no-op returning `None` while a batch is running or when the working
    /// set is empty. A cancelled batch goes back to `Idle` and also returns
    /// `None`; otherwise the session ends `Completed` with fresh stats.
    pub fn run(&mut self, reporter: &dyn ProgressReporter) -> Option<&BatchStats> {
        if self.state == BatchState::Running || self.working_set.is_empty() {
            return None;
        }

        self.state = BatchState::Running;
        self.cancel.reset();
        self.results.clear();
        self.failures.clear();
        self.stats = None;
        self.progress = Progress::new(self.working_set.len());
        reporter.start_batch(self.working_set.len());

        let outcome = run_batch(
            &self.codec,
            &self.working_set,
            &self.options,
            &self.cancel,
            reporter,
        );

        self.results = outcome.results;
        self.failures = outcome.failures;
        self.progress = outcome.progress;

        if outcome.cancelled {
            self.state = BatchState::Idle;
            reporter.batch_cancelled(self.progress);
            return None;
        }

        let stats = BatchStats::aggregate(outcome.attempted, &self.results);
        reporter.finish_batch(&stats);
        self.state = BatchState::Completed;
        self.stats = Some(stats);
        self.stats.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let items = self
            .working_set
            .iter()
            .map(|item| {
                let result = self.result_for(item);
                ItemView {
                    id: item.id,
                    display_name: item.display_name.clone(),
                    original_size: item.original_size,
                    converted_size: result.map(|r| r.converted_size()),
                    compression_ratio: result.map(|r| r.compression_ratio().to_string()),
                }
            })
            .collect();

        SessionSnapshot {
            state: self.state,
            items,
            progress: self.progress,
            stats: self.stats.clone(),
            converted: self.results.len(),
            failed: self.failures.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqueezeError;
    use crate::formats::TargetFormat;
    use crate::progress::NoOpProgressReporter;

    /// Encodes each payload to 40% of its length; payloads starting with
    /// `!` fail to decode.
    struct FortyPercentCodec;

    impl ImageCodec for FortyPercentCodec {
        type Surface = usize;

        fn decode(&self, bytes: &[u8]) -> Result<usize> {
            if bytes.first() == Some(&b'!') {
                return Err(SqueezeError::UnsupportedFormat("corrupt".to_string()));
            }
            Ok(bytes.len())
        }

        fn encode(&self, len: &usize, _: TargetFormat, _: f32) -> Result<Vec<u8>> {
            Ok(vec![0u8; len * 2 / 5])
        }
    }

    fn session() -> Session<FortyPercentCodec> {
        Session::new(FortyPercentCodec, ConversionOptions::default())
    }

    fn png(name: &str, size: usize) -> CandidateFile {
        CandidateFile::new(name, "image/png", vec![1u8; size])
    }

    fn broken(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/png", b"!broken".to_vec())
    }

    #[test]
    fn test_three_file_batch() {
        let mut session = session();
        session.add_files(vec![
            png("a.png", 1_000_000),
            png("b.png", 500_000),
            png("c.png", 250_000),
        ]);

        let stats = session.run(&NoOpProgressReporter).cloned().unwrap();

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_original_size, 1_750_000);
        assert_eq!(stats.total_converted_size, 700_000);
        assert_eq!(stats.total_savings, 1_050_000);
        assert_eq!(stats.compression_ratio, "60.0");
        assert_eq!(session.state(), BatchState::Completed);
        assert!(session.progress().is_complete());
    }

    #[test]
    fn test_empty_working_set_stays_idle() {
        let mut session = session();
        assert!(session.run(&NoOpProgressReporter).is_none());
        assert_eq!(session.state(), BatchState::Idle);
    }

    #[test]
    fn test_partial_failure() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100), broken("b.png")]);

        let stats = session.run(&NoOpProgressReporter).cloned().unwrap();

        assert_eq!(session.results().len(), 1);
        assert_eq!(session.failures().len(), 1);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_original_size, 100);
        assert_eq!(stats.total_converted_size, 40);
        assert_eq!(session.progress().fraction(), 1.0);
    }

    #[test]
    fn test_all_failed_completes_with_sentinel() {
        let mut session = session();
        session.add_files(vec![broken("a.png"), broken("b.png")]);

        let stats = session.run(&NoOpProgressReporter).cloned().unwrap();

        assert!(session.results().is_empty());
        assert_eq!(stats.compression_ratio, "0.0");
        assert_eq!(session.state(), BatchState::Completed);
    }

    #[test]
    fn test_rerun_replaces_results() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100)]);
        session.run(&NoOpProgressReporter);
        session.add_files(vec![png("b.png", 50)]);

        let stats = session.run(&NoOpProgressReporter).cloned().unwrap();

        assert_eq!(session.results().len(), 2);
        assert_eq!(stats.total_original_size, 150);
    }

    #[test]
    fn test_remove_drops_derived_result() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100), png("b.png", 100)]);
        session.run(&NoOpProgressReporter);

        let first = session.items()[0].clone();
        assert!(session.result_for(&first).is_some());
        assert!(session.remove(first.id));

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.results().len(), 1);
        assert!(session.result_for(&first).is_none());
        assert!(!session.remove(first.id));

        let snapshot = session.snapshot();
        let stats = snapshot.stats.unwrap();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_original_size, 100);
        assert_eq!(stats.total_converted_size, 40);
        assert_eq!(stats.total_savings, 60);
        assert_eq!(snapshot.progress, Progress { processed: 1, total: 1 });
        assert_eq!(snapshot.state, BatchState::Completed);
    }

    #[test]
    fn test_remove_failed_item_updates_stats() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100), broken("b.png")]);
        session.run(&NoOpProgressReporter);

        let failed = session.items()[1].id;
        assert!(session.remove(failed));

        assert!(session.failures().is_empty());
        let stats = session.stats().unwrap();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.compression_ratio, "60.0");
    }

    #[test]
    fn test_remove_unconverted_item_keeps_stats() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100)]);
        session.run(&NoOpProgressReporter);
        session.add_files(vec![png("late.png", 100)]);

        let late = session.items()[1].id;
        assert!(session.remove(late));

        assert_eq!(session.stats().unwrap().total_files, 1);
        assert!(session.progress().is_complete());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        struct CancelFromThread(CancelToken);
        impl ProgressReporter for CancelFromThread {
            fn update_progress(&self, _: Progress) {
                let token = self.0.clone();
                std::thread::spawn(move || token.cancel()).join().unwrap();
            }
        }

        let mut session = session();
        session.add_files(vec![png("a.png", 10), png("b.png", 10), png("c.png", 10)]);
        let reporter = CancelFromThread(session.cancel_token());

        assert!(session.run(&reporter).is_none());
        assert_eq!(session.state(), BatchState::Idle);
        assert_eq!(session.progress(), Progress { processed: 1, total: 3 });
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut session = session();
        session.add_files(vec![png("a.png", 10)]);
        let first_id = session.items()[0].id;
        session.remove(first_id);
        session.add_files(vec![png("a.png", 10)]);
        assert_ne!(session.items()[0].id, first_id);
    }

    #[test]
    fn test_clear_resets_state() {
        let mut session = session();
        session.add_files(vec![png("a.png", 100)]);
        session.run(&NoOpProgressReporter);
        session.clear();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, BatchState::Idle);
        assert!(snapshot.items.is_empty());
        assert!(snapshot.stats.is_none());
    }

    #[test]
    fn test_cancelled_batch_returns_to_idle() {
        struct CancelOnFirst(CancelToken);
        impl ProgressReporter for CancelOnFirst {
            fn update_progress(&self, _: Progress) {
                self.0.cancel();
            }
        }

        let mut session = session();
        session.add_files(vec![png("a.png", 10), png("b.png", 10)]);
        let reporter = CancelOnFirst(session.cancel_token());

        assert!(session.run(&reporter).is_none());
        assert_eq!(session.state(), BatchState::Idle);
        assert_eq!(session.results().len(), 1);
        assert!(session.stats().is_none());

        // the next run starts with a fresh token
        assert!(session.run(&NoOpProgressReporter).is_some());
        assert_eq!(session.results().len(), 2);
    }

    #[test]
    fn test_snapshot_items() {
        let mut session = session();
        session.add_files(vec![
            png("a.png", 100),
            broken("b.png"),
            CandidateFile::new("c.txt", "text/plain", vec![]),
        ]);
        session.run(&NoOpProgressReporter);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].converted_size, Some(40));
        assert_eq!(snapshot.items[0].compression_ratio.as_deref(), Some("60.0"));
        assert_eq!(snapshot.items[1].converted_size, None);
        assert_eq!(snapshot.converted, 1);
        assert_eq!(snapshot.failed, 1);
    }

    #[test]
    fn test_set_quality_validates() {
        let mut session = session();
        assert!(session.set_quality(50).is_ok());
        assert_eq!(session.options().quality, 50);
        assert!(matches!(session.set_quality(0), Err(SqueezeError::InvalidQuality(0))));
        assert_eq!(session.options().quality, 50);
    }
}
