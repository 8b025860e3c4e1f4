use fwprims_stream::{ErrorKind, StreamError};

/// Errors that can occur while validating or parsing a firmware container.
#[derive(Debug, thiserror::Error)]
pub enum FirmwareError {
    /// A stream or buffer read failed.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// The fixed-layout header did not match the format.
    #[error("invalid {structure} at 0x{offset:x}: {reason}")]
    InvalidHeader {
        structure: &'static str,
        offset: usize,
        reason: String,
    },

    /// No registered format validated at the given offset.
    #[error("no known firmware format at 0x{offset:x}")]
    UnknownFormat { offset: usize },

    /// The payload length is not the one the format mandates.
    #[error("firmware size expected 0x{expected:x}, got 0x{actual:x}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The image exceeds the configured load limit.
    #[error("firmware too large (0x{size:x} bytes, max 0x{max:x})")]
    TooLarge { size: usize, max: usize },

    /// The checksum stored in the image does not match the computed one.
    #[error("checksum mismatch, got 0x{actual:04x}, expected 0x{expected:04x}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    /// A size or version could not be derived from the header fields.
    #[error("{0}")]
    Compute(String),

    /// No format registered under the requested name.
    #[error("unknown firmware format: {0}")]
    UnknownName(String),

    /// Another error with the failing operation prepended.
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<FirmwareError>,
    },
}

impl FirmwareError {
    /// Prefix this error with `context`, keeping its kind.
    pub fn context(self, context: impl Into<String>) -> Self {
        FirmwareError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The failure class of this error, looking through any context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FirmwareError::Stream(err) => err.kind(),
            FirmwareError::InvalidHeader { .. } | FirmwareError::UnknownFormat { .. } => {
                ErrorKind::InvalidHeader
            }
            FirmwareError::SizeMismatch { .. } | FirmwareError::TooLarge { .. } => {
                ErrorKind::SizeMismatch
            }
            FirmwareError::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            FirmwareError::Compute(_) => ErrorKind::ComputeFailed,
            FirmwareError::UnknownName(_) => ErrorKind::NotSupported,
            FirmwareError::Context { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FirmwareError>;
