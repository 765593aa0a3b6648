use std::fmt;
use std::io;

use sensmatrix::Error;
use sensmatrix_frame::FrameError;
use sensmatrix_sink::SinkError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::EndOfStream => CliError::new(FAILURE, format!("{context}: {err}")),
        other @ (FrameError::ChannelOutOfRange(_) | FrameError::ValueOutOfRange(_)) => {
            CliError::new(DATA_INVALID, format!("{context}: {other}"))
        }
    }
}

pub fn sink_error(context: &str, err: SinkError) -> CliError {
    match err {
        SinkError::CreateDir { ref source, .. } | SinkError::Open { ref source, .. } => {
            let code = match source.kind() {
                io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
                _ => FAILURE,
            };
            CliError::new(code, format!("{context}: {err}"))
        }
        SinkError::Io(source) => io_error(context, source),
        SinkError::Template { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        SinkError::Length { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn pipeline_error(context: &str, err: Error) -> CliError {
    match err {
        Error::Frame(err) => frame_error(context, err),
        Error::Sink(err) => sink_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_maps_to_dedicated_code() {
        let err = sink_error(
            "record failed",
            SinkError::Open {
                path: "/root/x.csv".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.starts_with("record failed: failed to open log file"));
    }

    #[test]
    fn bad_template_is_usage_error() {
        let err = sink_error(
            "record failed",
            SinkError::Template {
                template: "%".to_string(),
                message: "bad".to_string(),
            },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn frame_io_error_unwraps_to_io_mapping() {
        let err = pipeline_error(
            "decode failed",
            Error::Frame(FrameError::Io(io::Error::from(io::ErrorKind::NotFound))),
        );
        assert_eq!(err.code, FAILURE);
    }
}
