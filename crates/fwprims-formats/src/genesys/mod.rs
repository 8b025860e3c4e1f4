//! Genesys Logic USB hub firmware.
//!
//! Hub images embed several sub-firmwares; each one stores its code size in
//! 1 KiB units, a trailing big-endian sum16 checksum and a little-endian
//! BCD-style version word.

mod pd;

pub use pd::{GenesysPdFirmware, GENESYS_PD_FIRMWARE_HDR};

use bytes::Bytes;
use fwprims_firmware::{FirmwareBuilder, FirmwareError, Result};
use fwprims_stream::{mem, sum, Endian};

/// Offset of the code-size byte, relative to the image start.
pub const CODE_SIZE_OFFSET: usize = 0xFB;
/// Offset of the version word inside the truncated image.
pub const VERSION_OFFSET: usize = 0x10E;

/// Sub-firmware kinds found in a hub image, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GenesysFwType {
    Hub = 0,
    DevBridge = 1,
    Pd = 2,
    Codesign = 3,
    InsideHub = 4,
}

impl GenesysFwType {
    pub fn as_str(self) -> &'static str {
        match self {
            GenesysFwType::Hub => "HUB",
            GenesysFwType::DevBridge => "DEV_BRIDGE",
            GenesysFwType::Pd => "PD",
            GenesysFwType::Codesign => "CODESIGN",
            GenesysFwType::InsideHub => "INSIDE_HUB",
        }
    }

    pub fn idx(self) -> u64 {
        self as u64
    }
}

impl std::fmt::Display for GenesysFwType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code size of the image at `offset`, in bytes.
pub fn calculate_size(fw: &[u8], offset: usize) -> Result<usize> {
    let kbs = mem::read_u8(fw, offset + CODE_SIZE_OFFSET)?;
    if kbs == 0 {
        return Err(FirmwareError::Compute("invalid codesize".into()));
    }
    Ok(usize::from(kbs) * 1024)
}

/// Compare the trailing big-endian checksum with the sum16 of everything before it.
pub fn verify_checksum(fw: &Bytes) -> Result<()> {
    let body_len = fw.len().checked_sub(2).ok_or_else(|| {
        FirmwareError::Compute(format!("image of 0x{:x} bytes has no checksum", fw.len()))
    })?;
    let expected = mem::read_u16(fw, body_len, Endian::Big)?;
    let actual = sum::sum16(&fw[..body_len]);
    if actual != expected {
        return Err(FirmwareError::ChecksumMismatch {
            expected: u64::from(expected),
            actual: u64::from(actual),
        });
    }
    Ok(())
}

/// Read the version word from the staged payload.
pub fn ensure_version(firmware: &mut FirmwareBuilder) -> Result<()> {
    let raw = mem::read_u16(firmware.bytes(), VERSION_OFFSET, Endian::Little)?;
    let [lo, hi] = raw.to_le_bytes();
    firmware
        .set_version_raw(u64::from(raw))
        .set_version(format!("{hi:02x}.{lo:02x}"));
    Ok(())
}
