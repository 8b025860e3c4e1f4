/// Machine-distinguishable failure classes shared by every fwprims layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Buffer arithmetic would overflow the destination; detected before I/O.
    OutOfRange,
    SeekFailed,
    ReadFailed,
    /// Fewer bytes were returned than requested.
    PartialRead,
    InvalidHeader,
    SizeMismatch,
    ChecksumMismatch,
    /// Format-specific size or version derivation failed.
    ComputeFailed,
    /// The requested format or algorithm is not known.
    NotSupported,
}

impl ErrorKind {
    /// Stable lowercase name, used in logs and machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::OutOfRange => "out-of-range",
            ErrorKind::SeekFailed => "seek-failed",
            ErrorKind::ReadFailed => "read-failed",
            ErrorKind::PartialRead => "partial-read",
            ErrorKind::InvalidHeader => "invalid-header",
            ErrorKind::SizeMismatch => "size-mismatch",
            ErrorKind::ChecksumMismatch => "checksum-mismatch",
            ErrorKind::ComputeFailed => "compute-failed",
            ErrorKind::NotSupported => "not-supported",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while reading from a [`SafeStream`](crate::SafeStream)
/// or from an in-memory buffer.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// `offset + count` does not fit in the destination or source buffer.
    #[error("0x{offset:x} + 0x{count:x} exceeds buffer size 0x{capacity:x}")]
    OutOfRange {
        offset: usize,
        count: usize,
        capacity: usize,
    },

    /// The backing file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Seeking to an absolute offset failed.
    #[error("seek to 0x{offset:x}: {source}")]
    Seek {
        offset: usize,
        source: std::io::Error,
    },

    /// Seeking to the end of the stream failed.
    #[error("seek to end: {source}")]
    SeekEnd { source: std::io::Error },

    /// The underlying read call reported an error.
    #[error("failed read of 0x{count:x}: {source}")]
    Read {
        count: usize,
        source: std::io::Error,
    },

    /// The read returned fewer bytes than requested.
    #[error("requested 0x{requested:x} and got 0x{actual:x}")]
    PartialRead { requested: usize, actual: usize },

    /// A fold was asked to use a zero-sized window.
    #[error("chunk window size must be non-zero")]
    ZeroWindow,

    /// A chunk index past the end of the layout was requested.
    #[error("chunk index {index} out of range (count {count})")]
    ChunkIndex { index: usize, count: usize },

    /// The checksum algorithm name is not recognized.
    #[error("unsupported checksum algorithm: {0}")]
    UnsupportedChecksum(String),
}

impl StreamError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::OutOfRange { .. }
            | StreamError::ZeroWindow
            | StreamError::ChunkIndex { .. } => ErrorKind::OutOfRange,
            StreamError::Seek { .. } | StreamError::SeekEnd { .. } => ErrorKind::SeekFailed,
            StreamError::Open { .. } | StreamError::Read { .. } => ErrorKind::ReadFailed,
            StreamError::PartialRead { .. } => ErrorKind::PartialRead,
            StreamError::UnsupportedChecksum(_) => ErrorKind::NotSupported,
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
