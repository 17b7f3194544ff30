use crate::error::SeriesError;
use icmplot_model::ProbeRecord;
use std::fs;
use std::path::Path;

/// Loads a previously saved record batch: a bare JSON array of records.
/// A missing path is its own error so callers can tell "wrong path" from
/// "corrupt file".
pub fn load_records(path: &Path) -> Result<Vec<ProbeRecord>, SeriesError> {
    if !path.exists() {
        return Err(SeriesError::SourceMissing(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path).map_err(|source| SeriesError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| SeriesError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
