use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or aggregating a record batch. Data problems
/// surface here as matchable variants instead of index panics downstream.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The batch holds no records at all.
    #[error("empty record batch: nothing to aggregate")]
    EmptyBatch,

    /// The JSON source path does not exist.
    #[error("record source not found: {0}")]
    SourceMissing(PathBuf),

    /// The JSON source exists but could not be read.
    #[error("failed to read records {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The JSON source is not a valid record batch.
    #[error("failed to parse records {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A host's cycle count disagrees with the first host's. Index-based
    /// per-cycle lookups would run past the end, so the batch is rejected.
    #[error("ragged cycle counts: host {host} has {actual} cycles, expected {expected}")]
    RaggedCycles {
        host: String,
        expected: usize,
        actual: usize,
    },
}
