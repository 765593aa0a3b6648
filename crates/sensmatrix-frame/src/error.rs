/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source ran dry while hunting for a marker or inside a frame.
    #[error("end of stream (incomplete frame)")]
    EndOfStream,

    /// An I/O error occurred while reading bytes from the source.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel does not fit the 6-bit marker field.
    #[error("channel out of range ({0}, max 63)")]
    ChannelOutOfRange(u8),

    /// The value does not fit the 10-bit data field.
    #[error("value out of range ({0}, max 1023)")]
    ValueOutOfRange(u16),
}

pub type Result<T> = std::result::Result<T, FrameError>;
