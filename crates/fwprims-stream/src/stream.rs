use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;
use tracing::trace;

use crate::checksum::{ChecksumKind, StreamingHasher};
use crate::chunk::{Chunk, ChunkLayout, DEFAULT_CHUNK_SIZE};
use crate::endian::Endian;
use crate::error::{Result, StreamError};
use crate::mem::check_write;
use crate::sum::{sum16, sum8};

/// Any seekable, readable byte source: files, in-memory cursors, device wrappers.
pub trait ByteSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> ByteSource for T {}

/// A [`SafeStream`] over a type-erased backend.
///
/// `&mut SafeStream<File>` (or any other sized backend) coerces to
/// `&mut DynStream<'_>`.
pub type DynStream<'a> = SafeStream<dyn ByteSource + 'a>;

/// Bounds-checked reader over a seekable byte source.
///
/// Every read seeks to an absolute offset first and leaves the source
/// positioned after the bytes it read. Reads mutate the source position, so
/// a stream must not be shared between concurrent readers.
pub struct SafeStream<R: ?Sized> {
    inner: R,
}

impl<R> SafeStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Consume the stream and return the inner source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl SafeStream<File> {
    /// Open `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file))
    }
}

impl<R: ?Sized> SafeStream<R> {
    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: Read + Seek + ?Sized> SafeStream<R> {
    /// Read exactly `count` bytes at stream offset `seek_to` into
    /// `buf[offset..offset + count]`.
    ///
    /// The destination range is checked before the source is touched. A read
    /// that returns fewer than `count` bytes fails with
    /// [`StreamError::PartialRead`].
    pub fn read_safe(
        &mut self,
        buf: &mut [u8],
        offset: usize,
        seek_to: usize,
        count: usize,
    ) -> Result<()> {
        check_write(buf.len(), offset, count)?;
        self.inner
            .seek(SeekFrom::Start(seek_to as u64))
            .map_err(|source| StreamError::Seek {
                offset: seek_to,
                source,
            })?;

        let dst = &mut buf[offset..offset + count];
        let read = loop {
            match self.inner.read(dst) {
                Ok(n) => break n,
                Err(err) if err.kind() == IoErrorKind::Interrupted => continue,
                Err(source) => return Err(StreamError::Read { count, source }),
            }
        };

        if read != count {
            return Err(StreamError::PartialRead {
                requested: count,
                actual: read,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self, offset: usize) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_safe(&mut buf, 0, offset, N)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self, offset: usize) -> Result<u8> {
        let [value] = self.read_array::<1>(offset)?;
        Ok(value)
    }

    pub fn read_u16(&mut self, offset: usize, endian: Endian) -> Result<u16> {
        Ok(endian.u16(self.read_array(offset)?))
    }

    /// Read a 3-byte integer, zero-extended to `u32`.
    pub fn read_u24(&mut self, offset: usize, endian: Endian) -> Result<u32> {
        Ok(endian.u24(self.read_array(offset)?))
    }

    pub fn read_u32(&mut self, offset: usize, endian: Endian) -> Result<u32> {
        Ok(endian.u32(self.read_array(offset)?))
    }

    pub fn read_u64(&mut self, offset: usize, endian: Endian) -> Result<u64> {
        Ok(endian.u64(self.read_array(offset)?))
    }

    /// Read `length` bytes at `offset` into a new buffer.
    pub fn read_buf(&mut self, offset: usize, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        if length > 0 {
            self.read_safe(&mut buf, 0, offset, length)?;
        }
        Ok(buf)
    }

    /// Read `length` bytes at `offset` into an immutable, shareable buffer.
    pub fn read_bytes(&mut self, offset: usize, length: usize) -> Result<Bytes> {
        self.read_buf(offset, length).map(Bytes::from)
    }

    /// Total size of the source in bytes.
    ///
    /// Seeks to the end and back again, so the current position is preserved.
    /// The result is not cached.
    pub fn size(&mut self) -> Result<usize> {
        let restore = self
            .inner
            .stream_position()
            .map_err(|source| StreamError::SeekEnd { source })?;
        let end = self
            .inner
            .seek(SeekFrom::End(0))
            .map_err(|source| StreamError::SeekEnd { source })?;
        self.inner
            .seek(SeekFrom::Start(restore))
            .map_err(|source| StreamError::Seek {
                offset: restore as usize,
                source,
            })?;
        Ok(end as usize)
    }

    /// Walk the whole source in windows of at most `window` bytes.
    ///
    /// `f` is called once per window in ascending offset order; the last
    /// window may be short. The first error from a read or from `f` stops the
    /// walk and is returned.
    pub fn fold<A, E, F>(
        &mut self,
        window: usize,
        acc: &mut A,
        mut f: F,
    ) -> std::result::Result<(), E>
    where
        E: From<StreamError>,
        F: FnMut(&Chunk<'_>, &mut A) -> std::result::Result<(), E>,
    {
        let layout = ChunkLayout::new(self.size()?, window)?;
        trace!(
            total = layout.total(),
            window,
            chunks = layout.count(),
            "folding stream"
        );

        let mut buf = vec![0u8; window.min(layout.total())];
        for idx in 0..layout.count() {
            let (offset, len) = layout.index(idx)?;
            self.read_safe(&mut buf, 0, offset, len)?;
            f(&Chunk::new(idx, offset, &buf[..len]), acc)?;
        }
        Ok(())
    }

    /// [`fold`](Self::fold) with the default 32 KiB window.
    pub fn chunkify<A, E, F>(&mut self, acc: &mut A, f: F) -> std::result::Result<(), E>
    where
        E: From<StreamError>,
        F: FnMut(&Chunk<'_>, &mut A) -> std::result::Result<(), E>,
    {
        self.fold(DEFAULT_CHUNK_SIZE, acc, f)
    }

    /// Digest of the entire source as lowercase hex.
    pub fn compute_checksum(&mut self, kind: ChecksumKind) -> Result<String> {
        let mut hasher = StreamingHasher::new(kind);
        self.chunkify(&mut hasher, |chunk, h: &mut StreamingHasher| {
            h.update(chunk.data());
            Ok::<(), StreamError>(())
        })?;
        Ok(hasher.finalize())
    }

    /// Arithmetic sum of every byte, modulo 256.
    pub fn compute_sum8(&mut self) -> Result<u8> {
        let mut value = 0u8;
        self.chunkify(&mut value, |chunk, value: &mut u8| {
            *value = value.wrapping_add(sum8(chunk.data()));
            Ok::<(), StreamError>(())
        })?;
        Ok(value)
    }

    /// Arithmetic sum of every byte, modulo 65536. Reported by `fwprims checksum --sum16`.
    pub fn compute_sum16(&mut self) -> Result<u16> {
        let mut value = 0u16;
        self.chunkify(&mut value, |chunk, value: &mut u16| {
            *value = value.wrapping_add(sum16(chunk.data()));
            Ok::<(), StreamError>(())
        })?;
        Ok(value)
    }
}

impl<R: ?Sized> std::fmt::Debug for SafeStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeStream").finish_non_exhaustive()
    }
}
