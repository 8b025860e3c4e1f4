//! Wrapping arithmetic sums used as simple firmware checksums.
//!
//! `sum16` backs the Genesys trailer check; the word sums cover vendor
//! formats that checksum 16- or 32-bit words instead of bytes.

use crate::endian::Endian;

/// Sum of all bytes, modulo 256.
pub fn sum8(buf: &[u8]) -> u8 {
    buf.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Sum of all bytes into a 16-bit accumulator, modulo 65536.
pub fn sum16(buf: &[u8]) -> u16 {
    buf.iter().fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}

/// Sum of 16-bit words. A trailing odd byte is ignored.
pub fn sum16w(buf: &[u8], endian: Endian) -> u16 {
    buf.chunks_exact(2)
        .fold(0u16, |acc, w| acc.wrapping_add(endian.u16([w[0], w[1]])))
}

/// Sum of 32-bit words. Trailing bytes that do not fill a word are ignored.
pub fn sum32w(buf: &[u8], endian: Endian) -> u32 {
    buf.chunks_exact(4).fold(0u32, |acc, w| {
        acc.wrapping_add(endian.u32([w[0], w[1], w[2], w[3]]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum8_wraps() {
        assert_eq!(sum8(&[]), 0);
        assert_eq!(sum8(&[0xff, 0x02]), 0x01);
        assert_eq!(sum8(&[1u8; 300]), (300 % 256) as u8);
    }

    #[test]
    fn sum16_adds_bytes() {
        assert_eq!(sum16(&[0xff, 0xff, 0x02]), 0x0200);
        assert_eq!(sum16(&vec![0xffu8; 0x101]), 0xffu16.wrapping_mul(0x101));
    }

    #[test]
    fn word_sums_respect_endian() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0xaa];
        assert_eq!(sum16w(&buf, Endian::Little), 0x0201 + 0x0403);
        assert_eq!(sum16w(&buf, Endian::Big), 0x0102 + 0x0304);
        assert_eq!(sum32w(&buf, Endian::Big), 0x0102_0304);
        assert_eq!(sum32w(&[0xff; 8], Endian::Little), 0xffff_fffe);
    }
}
