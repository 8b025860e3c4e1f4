use std::fmt;
use std::io;

use fwprims_firmware::FirmwareError;
use fwprims_stream::{ErrorKind, StreamError};

// Process exit codes shared by every subcommand.
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

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    CliError::new(stream_code(&err), format!("{context}: {err}"))
}

pub fn firmware_error(context: &str, err: FirmwareError) -> CliError {
    CliError::new(firmware_code(&err), format!("{context}: {err}"))
}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::IsADirectory => FAILURE,
        _ => INTERNAL,
    }
}

fn stream_code(err: &StreamError) -> i32 {
    match err {
        StreamError::Open { source, .. }
        | StreamError::Seek { source, .. }
        | StreamError::SeekEnd { source }
        | StreamError::Read { source, .. } => io_code(source.kind()),
        other => exit_code(other.kind()),
    }
}

fn firmware_code(err: &FirmwareError) -> i32 {
    match err {
        FirmwareError::Stream(err) => stream_code(err),
        FirmwareError::Context { source, .. } => firmware_code(source),
        other => exit_code(other.kind()),
    }
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::OutOfRange
        | ErrorKind::PartialRead
        | ErrorKind::InvalidHeader
        | ErrorKind::SizeMismatch
        | ErrorKind::ChecksumMismatch
        | ErrorKind::ComputeFailed => DATA_INVALID,
        ErrorKind::NotSupported => USAGE,
        ErrorKind::SeekFailed | ErrorKind::ReadFailed => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_data_invalid() {
        let err = firmware_error(
            "parse",
            FirmwareError::ChecksumMismatch {
                expected: 1,
                actual: 2,
            }
            .context("not valid for pd"),
        );
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(
            err.message,
            "parse: not valid for pd: checksum mismatch, got 0x0002, expected 0x0001"
        );

        let err = firmware_error("parse", FirmwareError::UnknownFormat { offset: 0 });
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn unknown_format_name_is_usage() {
        let err = firmware_error("parse", FirmwareError::UnknownName("zulu".into()));
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn io_sources_keep_their_kind() {
        let err = stream_error(
            "size",
            StreamError::SeekEnd {
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = stream_error(
            "input",
            StreamError::Open {
                path: "/missing.bin".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("input: failed to open /missing.bin: "));
    }

    #[test]
    fn io_failures_keep_offsets_and_counts() {
        let err = stream_error(
            "peek f",
            StreamError::Seek {
                offset: 0x40,
                source: io::Error::other("seek refused"),
            },
        );
        assert_eq!(err.code, INTERNAL);
        assert_eq!(err.message, "peek f: seek to 0x40: seek refused");

        let err = stream_error(
            "checksum f",
            StreamError::Read {
                count: 0x8000,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.starts_with("checksum f: failed read of 0x8000: "));
    }

    #[test]
    fn wrapped_io_failures_keep_io_code() {
        let err = firmware_error(
            "parse f",
            FirmwareError::from(StreamError::Seek {
                offset: 0x40,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            })
            .context("not valid for pd"),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err
            .message
            .starts_with("parse f: not valid for pd: seek to 0x40: "));
    }
}
