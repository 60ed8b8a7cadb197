use crate::constants::{DEFAULT_RETRIEVAL_DELAY_MS, MAX_NAME_SUFFIX};
use crate::error::{Result, SqueezeError};
use crate::model::ConversionResult;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Destination for converted files.
pub trait SaveSink {
    /// Store `bytes` under `suggested_name` or a variant of it, returning
    /// the name actually used.
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String>;
}

/// Writes results into a directory.
///
/// Each file is written to a temporary file inside the directory and then
/// renamed into place, so a failed save leaves nothing behind. Existing files
/// are never replaced: a taken name becomes `name (1).ext`, `name (2).ext`
/// and so on.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create the sink, creating the directory if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|_| SqueezeError::DirectoryCreationFailed(dir.clone()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String> {
        // Only the final component is honoured; names never escape the directory
        let file_name = Path::new(suggested_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SqueezeError::SaveFailed(
                    suggested_name.to_string(),
                    "invalid file name".to_string(),
                )
            })?;

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(bytes)?;

        for attempt in 0..=MAX_NAME_SUFFIX {
            let name = numbered_name(&file_name, attempt);
            let target = self.dir.join(&name);

            match temp.persist_noclobber(&target) {
                Ok(_) => {
                    debug!(path = %target.display(), bytes = bytes.len(), "saved");
                    return Ok(name);
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
                Err(e) => {
                    return Err(SqueezeError::SaveFailed(
                        suggested_name.to_string(),
                        e.error.to_string(),
                    ))
                }
            }
        }

        Err(SqueezeError::SaveFailed(
            suggested_name.to_string(),
            "no free file name".to_string(),
        ))
    }
}

/// `photo.webp` with `n = 2` becomes `photo (2).webp`; `n = 0` is unchanged.
fn numbered_name(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", file_name, n),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalOptions {
    /// Pause between consecutive saves. Not applied after the last one.
    pub delay: Duration,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_RETRIEVAL_DELAY_MS),
        }
    }
}

impl RetrievalOptions {
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// A result that could not be saved.
#[derive(Debug)]
pub struct RetrievalFailure {
    pub output_name: String,
    pub error: SqueezeError,
}

#[derive(Debug, Default)]
pub struct RetrievalReport {
    pub saved: Vec<String>,
    pub failures: Vec<RetrievalFailure>,
}

/// Hand one result to the sink, returning the name it was saved under.
pub fn retrieve_one<S: SaveSink + ?Sized>(sink: &S, result: &ConversionResult) -> Result<String> {
    sink.save(result.output_payload(), result.output_name())
}

/// Save every result in production order, pausing between items.
///
/// A failed save is logged and recorded; later items are still attempted.
pub fn retrieve_all<S: SaveSink + ?Sized>(
    sink: &S,
    results: &[ConversionResult],
    options: &RetrievalOptions,
) -> RetrievalReport {
    let mut report = RetrievalReport::default();

    for (index, result) in results.iter().enumerate() {
        if index > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }

        match retrieve_one(sink, result) {
            Ok(name) => report.saved.push(name),
            Err(error) => {
                warn!(file = %result.output_name(), %error, "save failed");
                report.failures.push(RetrievalFailure {
                    output_name: result.output_name().to_string(),
                    error,
                });
            }
        }
    }

    report
}
