use crate::error::{Result, StreamError};

/// Default fold window: 32 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 0x8000;

/// A window of stream bytes handed to a fold callback.
///
/// The data borrows the fold's window buffer, so a chunk cannot outlive the
/// callback it was passed to.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    idx: usize,
    offset: usize,
    data: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub(crate) fn new(idx: usize, offset: usize, data: &'a [u8]) -> Self {
        Self { idx, offset, data }
    }

    /// Position of this chunk in the fold, starting at 0.
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Absolute stream offset of the first byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Partition of `total` bytes into consecutive windows of at most `window` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    total: usize,
    window: usize,
}

impl ChunkLayout {
    pub fn new(total: usize, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(StreamError::ZeroWindow);
        }
        Ok(Self { total, window })
    }

    /// Number of windows; zero for an empty source.
    pub fn count(&self) -> usize {
        self.total.div_ceil(self.window)
    }

    /// `(offset, len)` of window `index`. The last window may be short.
    pub fn index(&self, index: usize) -> Result<(usize, usize)> {
        let count = self.count();
        if index >= count {
            return Err(StreamError::ChunkIndex { index, count });
        }
        let offset = index * self.window;
        let len = self.window.min(self.total - offset);
        Ok((offset, len))
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_splits_with_short_tail() {
        let layout = ChunkLayout::new(0x10001, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(layout.count(), 3);
        assert_eq!(layout.index(0).unwrap(), (0, 0x8000));
        assert_eq!(layout.index(1).unwrap(), (0x8000, 0x8000));
        assert_eq!(layout.index(2).unwrap(), (0x10000, 0x1));
        assert!(matches!(
            layout.index(3),
            Err(StreamError::ChunkIndex { index: 3, count: 3 })
        ));
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let layout = ChunkLayout::new(0x20, 0x10).unwrap();
        assert_eq!(layout.count(), 2);
        assert_eq!(layout.index(1).unwrap(), (0x10, 0x10));
    }

    #[test]
    fn empty_source_has_no_windows() {
        let layout = ChunkLayout::new(0, 0x10).unwrap();
        assert_eq!(layout.count(), 0);
        assert!(layout.index(0).is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            ChunkLayout::new(10, 0),
            Err(StreamError::ZeroWindow)
        ));
    }
}
