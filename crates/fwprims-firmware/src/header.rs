use fwprims_stream::DynStream;

use crate::error::{FirmwareError, Result};

/// Fixed-layout header identified by a constant magic.
///
/// Validation reads exactly `size` bytes at the requested offset, whatever
/// the size of the rest of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Human-readable structure name used in errors.
    pub name: &'static str,
    /// Total header size in bytes.
    pub size: usize,
    /// Offset of the magic inside the header.
    pub magic_offset: usize,
    pub magic: &'static [u8],
}

impl HeaderLayout {
    pub const fn new(
        name: &'static str,
        size: usize,
        magic_offset: usize,
        magic: &'static [u8],
    ) -> Self {
        Self {
            name,
            size,
            magic_offset,
            magic,
        }
    }

    /// Check that a header of this layout starts at `offset` in `stream`.
    pub fn validate_stream(&self, stream: &mut DynStream<'_>, offset: usize) -> Result<()> {
        let header = stream.read_buf(offset, self.size).map_err(|err| {
            FirmwareError::from(err).context(format!("{} at 0x{offset:x}", self.name))
        })?;
        self.check_magic(&header, offset)
    }

    /// Check that a header of this layout starts at `offset` in `buf`.
    pub fn validate_bytes(&self, buf: &[u8], offset: usize) -> Result<()> {
        let header = fwprims_stream::mem::slice(buf, offset, self.size).map_err(|err| {
            FirmwareError::from(err).context(format!("{} at 0x{offset:x}", self.name))
        })?;
        self.check_magic(header, offset)
    }

    fn check_magic(&self, header: &[u8], offset: usize) -> Result<()> {
        let got = header
            .get(self.magic_offset..self.magic_offset + self.magic.len())
            .ok_or_else(|| FirmwareError::InvalidHeader {
                structure: self.name,
                offset,
                reason: format!(
                    "magic at 0x{:x} does not fit in 0x{:x} byte header",
                    self.magic_offset, self.size
                ),
            })?;

        if got != self.magic {
            return Err(FirmwareError::InvalidHeader {
                structure: self.name,
                offset,
                reason: format!(
                    "constant magic was not valid, expected '{}' and got '{}'",
                    self.magic.escape_ascii(),
                    got.escape_ascii()
                ),
            });
        }
        Ok(())
    }
}
