use std::path::PathBuf;

/// Errors raised by the sweep log writer.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// A row must carry exactly one value per channel.
    #[error("sweep has {actual} values, expected {expected}")]
    Length { expected: usize, actual: usize },

    /// The filename template could not be rendered.
    #[error("invalid filename template {template:?}: {message}")]
    Template { template: String, message: String },

    /// The log directory could not be created.
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing a row failed.
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;
