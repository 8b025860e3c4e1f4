/// Byte order used to decode multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn u16(self, buf: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(buf),
            Endian::Big => u16::from_be_bytes(buf),
        }
    }

    /// Decode a 3-byte unsigned integer, zero-extended to 32 bits.
    pub fn u24(self, buf: [u8; 3]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes([buf[0], buf[1], buf[2], 0]),
            Endian::Big => u32::from_be_bytes([0, buf[0], buf[1], buf[2]]),
        }
    }

    pub fn u32(self, buf: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(buf),
            Endian::Big => u32::from_be_bytes(buf),
        }
    }

    pub fn u64(self, buf: [u8; 8]) -> u64 {
        match self {
            Endian::Little => u64::from_le_bytes(buf),
            Endian::Big => u64::from_be_bytes(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_orders() {
        assert_eq!(Endian::Little.u16([0x34, 0x12]), 0x1234);
        assert_eq!(Endian::Big.u16([0x12, 0x34]), 0x1234);
        assert_eq!(Endian::Little.u32([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
        assert_eq!(Endian::Big.u32([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
        assert_eq!(
            Endian::Big.u64([0, 0, 0, 0, 0xde, 0xad, 0xbe, 0xef]),
            0xdead_beef
        );
    }

    #[test]
    fn u24_is_zero_extended() {
        assert_eq!(Endian::Little.u24([0xff, 0xff, 0xff]), 0x00ff_ffff);
        assert_eq!(Endian::Little.u24([0x01, 0x02, 0x03]), 0x0003_0201);
        assert_eq!(Endian::Big.u24([0x01, 0x02, 0x03]), 0x0001_0203);
    }
}
