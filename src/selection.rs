use crate::constants::MAX_FILE_SIZE;
use crate::error::{Result, SqueezeError};
use crate::formats::{media_type_for_name, TargetFormat};
use crate::model::{SourceId, SourceItem};
use glob::glob;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file offered for conversion, before the acceptance filter.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    ///
    /// Files that are not images by name are not read; their candidate has
    /// no bytes and is dropped by the acceptance filter. Images larger than
    /// `MAX_FILE_SIZE` are refused before reading.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SqueezeError::FileNotFound(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SqueezeError::FileNotFound(path.to_path_buf()))?;
        let media_type = media_type_for_name(&name);

        if !media_type.starts_with("image/") {
            return Ok(Self::new(name, media_type, Vec::new()));
        }

        let len = fs::metadata(path)?.len();
        if len > MAX_FILE_SIZE {
            return Err(SqueezeError::FileTooLarge(len, MAX_FILE_SIZE));
        }

        let bytes = fs::read(path)?;
        Ok(Self::new(name, media_type, bytes))
    }
}

/// Why a candidate was dropped. Rejection is silent towards the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    NotAnImage(String),
    AlreadyTargetFormat(TargetFormat),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::NotAnImage(media_type) => write!(f, "not an image ({})", media_type),
            RejectionReason::AlreadyTargetFormat(format) => write!(f, "already {}", format),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceRejection {
    pub name: String,
    pub reason: RejectionReason,
}

/// Hands out session-local ids: a counter that only ever goes up.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> SourceId {
        self.next += 1;
        SourceId(self.next)
    }
}

/// Check one candidate against the acceptance rules.
pub fn check_candidate(
    candidate: &CandidateFile,
    target: TargetFormat,
) -> std::result::Result<(), RejectionReason> {
    if !candidate.media_type.to_lowercase().starts_with("image/") {
        return Err(RejectionReason::NotAnImage(candidate.media_type.clone()));
    }
    if target.matches_name(&candidate.name) {
        return Err(RejectionReason::AlreadyTargetFormat(target));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Selection {
    pub accepted: Vec<Arc<SourceItem>>,
    pub rejected: Vec<AcceptanceRejection>,
}

/// Filter candidates and give each accepted one a fresh identity.
///
/// Accepted items keep the order they were offered in.
pub fn accept_candidates(
    candidates: Vec<CandidateFile>,
    target: TargetFormat,
    ids: &mut IdAllocator,
) -> Selection {
    let mut selection = Selection::default();

    for candidate in candidates {
        match check_candidate(&candidate, target) {
            Ok(()) => {
                let item = SourceItem::new(
                    ids.allocate(),
                    candidate.name,
                    candidate.media_type,
                    candidate.bytes,
                );
                selection.accepted.push(Arc::new(item));
            }
            Err(reason) => {
                debug!(file = %candidate.name, %reason, "candidate rejected");
                selection.rejected.push(AcceptanceRejection {
                    name: candidate.name,
                    reason,
                });
            }
        }
    }

    selection
}

/// Expand one input argument (file, directory or glob pattern) to file paths.
///
/// Hidden entries are skipped when walking directories. The acceptance filter
/// runs later, so non-image files are returned too.
pub fn collect_input_paths(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        paths.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
    } else {
        for entry in glob(input)?.flatten() {
            if entry.is_file() {
                paths.push(entry);
            }
        }
    }

    Ok(paths)
}

/// Read every file named by `inputs` into a candidate.
///
/// Unreadable or oversized files are skipped with a warning; an empty overall
/// result is an error.
pub fn gather_candidates(inputs: &[String], recursive: bool) -> Result<Vec<CandidateFile>> {
    let mut candidates = Vec::new();

    for input in inputs {
        for path in collect_input_paths(input, recursive)? {
            match CandidateFile::from_path(&path) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping input"),
            }
        }
    }

    if candidates.is_empty() {
        return Err(SqueezeError::NoImageFilesFound(inputs.join(", ")));
    }

    Ok(candidates)
}
