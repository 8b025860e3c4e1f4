//! Bounds-checked, chunked reads over seekable byte sources.
//!
//! This is the lowest layer of fwprims. Every read is:
//! - bounds-checked against the destination buffer before any I/O happens
//! - positioned with an absolute seek
//! - exact: a short read is an error, never zero-padded
//!
//! Whole-stream folds (digests, arithmetic sums) walk the source in fixed
//! windows so images never need to be materialized in memory.

pub mod checksum;
pub mod chunk;
pub mod endian;
pub mod error;
pub mod mem;
pub mod stream;
pub mod sum;

pub use checksum::{ChecksumKind, StreamingHasher};
pub use chunk::{Chunk, ChunkLayout, DEFAULT_CHUNK_SIZE};
pub use endian::Endian;
pub use error::{ErrorKind, Result, StreamError};
pub use stream::{ByteSource, DynStream, SafeStream};
