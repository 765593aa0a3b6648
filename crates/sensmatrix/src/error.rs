use sensmatrix_frame::FrameError;
use sensmatrix_sink::SinkError;

/// Errors from the record pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or decoding the byte source failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Writing the sweep log failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub type Result<T> = std::result::Result<T, Error>;
