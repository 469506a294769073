use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the sort pipeline.
///
/// Configuration problems are reported before any input is read. Read and
/// write failures on the input, the run files or the output stream are not
/// wrapped and propagate as [std::io::Error] inside [anyhow::Error].
#[derive(Error, Debug)]
pub enum SortError {
    /// The key field index must be positive. An index of 1 selects the first
    /// whitespace-delimited field.
    #[error("key field index must be greater than zero")]
    InvalidKeyField,

    #[error("input file not found: {}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create staging directory: {}", .path.display())]
    StagingDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create run file in: {}", .path.display())]
    RunFileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
