use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::AvocadoType;

// ---------------------------------------------------------------------------
// Data-layer errors
// ---------------------------------------------------------------------------

/// Failures produced while loading or slicing a price dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing columns, unparseable cells or an unsupported container.
    #[error("malformed data in {}: {reason}", .path.display())]
    DataFormat { path: PathBuf, reason: String },

    /// The region/type combination matched no rows.
    #[error("no rows for region '{region}' and type '{kind}'")]
    EmptyResult { region: String, kind: AvocadoType },
}

impl DataError {
    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DataError::DataFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Split a `csv::Error` into the I/O or format branch.
    pub(crate) fn from_csv(path: &std::path::Path, err: csv::Error) -> Self {
        if err.is_io_error() {
            if let csv::ErrorKind::Io(source) = err.into_kind() {
                return DataError::Io {
                    path: path.to_path_buf(),
                    source,
                };
            }
            return DataError::format(path, "I/O error while reading CSV");
        }
        DataError::format(path, err.to_string())
    }
}
