//! Bounds-checked reads from in-memory buffers.
//!
//! These mirror the stream readers for payloads that are already loaded,
//! and report the same [`StreamError::OutOfRange`] context. Format parsers
//! use them on the loaded image; every width the stream reads is offered.

use crate::endian::Endian;
use crate::error::{Result, StreamError};

/// Check that `n` bytes can be read from a `bufsz`-byte buffer at `offset`.
pub fn check_read(bufsz: usize, offset: usize, n: usize) -> Result<()> {
    match offset.checked_add(n) {
        Some(end) if end <= bufsz => Ok(()),
        _ => Err(StreamError::OutOfRange {
            offset,
            count: n,
            capacity: bufsz,
        }),
    }
}

/// Check that `n` bytes can be written into a `bufsz`-byte buffer at `offset`.
pub fn check_write(bufsz: usize, offset: usize, n: usize) -> Result<()> {
    check_read(bufsz, offset, n)
}

fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    check_read(buf.len(), offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[offset..offset + N]);
    Ok(out)
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    let [value] = read_array::<1>(buf, offset)?;
    Ok(value)
}

pub fn read_u16(buf: &[u8], offset: usize, endian: Endian) -> Result<u16> {
    Ok(endian.u16(read_array(buf, offset)?))
}

pub fn read_u24(buf: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    Ok(endian.u24(read_array(buf, offset)?))
}

pub fn read_u32(buf: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    Ok(endian.u32(read_array(buf, offset)?))
}

pub fn read_u64(buf: &[u8], offset: usize, endian: Endian) -> Result<u64> {
    Ok(endian.u64(read_array(buf, offset)?))
}

/// Borrow `len` bytes at `offset`.
pub fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    check_read(buf.len(), offset, len)?;
    Ok(&buf[offset..offset + len])
}
