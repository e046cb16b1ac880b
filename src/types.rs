//! Public and internal types for the dcmfind API and pipeline.

use std::path::PathBuf;

use crate::query::Query;
use crate::utils::config::{DEFAULT_FILE_PATTERN, DEFAULT_PARALLELISM};

/// Identifies one attribute in a decoded record. Equal iff `(group, element)` match.
pub type AttributeTag = dicom_core::Tag;

/// Everything a single search needs. Built once per invocation and never mutated after the
/// pipeline starts.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    /// Directory to search. Should be canonical; results are reported under this path.
    pub root: PathBuf,
    /// Glob applied to file names (`*` and `?`), case-insensitive.
    pub file_pattern: String,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// All must match (AND). Empty means every decodable file matches.
    pub queries: Vec<Query>,
    /// Stop after this many results. `None` means unbounded.
    pub limit: Option<usize>,
    /// Number of matcher workers.
    pub parallelism: usize,
    /// Emit ephemeral progress lines for every candidate.
    pub show_progress: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            recursive: true,
            follow_links: false,
            queries: Vec::new(),
            limit: None,
            parallelism: DEFAULT_PARALLELISM,
            show_progress: false,
        }
    }
}

/// One thing for the console reporter to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Candidate currently being decoded. Overwritten by whatever comes next.
    Progress(PathBuf),
    /// Accepted match. Stays on screen.
    Result(PathBuf),
}

impl ConsoleEvent {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConsoleEvent::Progress(p) | ConsoleEvent::Result(p) => p,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, ConsoleEvent::Progress(_))
    }
}

/// Counters collected from every stage once a search has shut down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Paths the walk sent to the matcher pool.
    pub candidates: usize,
    /// Walk entries skipped because they could not be read.
    pub skipped: usize,
    /// Decode attempts made by matcher workers.
    pub decode_attempts: usize,
    /// Candidates that decoded into at least one record.
    pub decoded: usize,
    /// Files that satisfied every query.
    pub matched: usize,
    /// Results forwarded to the console.
    pub emitted: usize,
    /// True when the limit stopped the search early.
    pub limit_reached: bool,
}
