use bytes::Bytes;
use fwprims_firmware::{
    Alignment, FirmwareBuilder, FirmwareContainer, FirmwareError, FirmwareFlags, HeaderLayout,
    InstallFlags, Result,
};
use fwprims_stream::{mem, DynStream};
use tracing::{debug, trace};

use super::{calculate_size, ensure_version, verify_checksum, GenesysFwType};

pub const GENESYS_PD_FIRMWARE_HDR: HeaderLayout =
    HeaderLayout::new("Genesys PD firmware header", 0x100, 0xFC, b"PRDY");

/// Power-delivery controller firmware embedded in Genesys hub images.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenesysPdFirmware;

impl GenesysPdFirmware {
    fn parse_pd(
        &self,
        fw: &Bytes,
        offset: usize,
        flags: InstallFlags,
        firmware: &mut FirmwareBuilder,
    ) -> Result<()> {
        let pd = GenesysFwType::Pd;
        firmware
            .set_id(pd.as_str())
            .set_idx(pd.idx())
            .set_alignment(Alignment::ALIGN_1K);

        // truncate to the declared code size
        let code_size = calculate_size(fw, offset)?;
        mem::check_read(fw.len(), offset, code_size)?;
        firmware.set_bytes(fw.slice(offset..offset + code_size));
        trace!(code_size, "truncated pd image");

        if flags.contains(InstallFlags::IGNORE_CHECKSUM) {
            debug!("skipping pd checksum");
        } else {
            verify_checksum(firmware.bytes())?;
            trace!("pd checksum verified");
        }

        ensure_version(firmware)?;
        trace!(version = firmware.version(), "pd version extracted");
        Ok(())
    }
}

impl FirmwareContainer for GenesysPdFirmware {
    fn name(&self) -> &'static str {
        "genesys-pd"
    }

    fn firmware_flags(&self) -> FirmwareFlags {
        FirmwareFlags::HAS_CHECKSUM
    }

    fn validate(&self, stream: &mut DynStream<'_>, offset: usize) -> Result<()> {
        GENESYS_PD_FIRMWARE_HDR.validate_stream(stream, offset)
    }

    fn parse(
        &self,
        fw: &Bytes,
        offset: usize,
        flags: InstallFlags,
        firmware: &mut FirmwareBuilder,
    ) -> Result<()> {
        self.parse_pd(fw, offset, flags, firmware)
            .map_err(|err: FirmwareError| err.context("not valid for pd"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek, SeekFrom};

    use fwprims_stream::{sum, ErrorKind, SafeStream};

    use super::*;
    use crate::genesys::{CODE_SIZE_OFFSET, VERSION_OFFSET};

    /// A valid PD image of `kbs` KiB followed by `trailing` filler bytes.
    fn image(kbs: u8, trailing: usize) -> Vec<u8> {
        let code_size = usize::from(kbs) * 1024;
        let mut buf: Vec<u8> = (0..code_size).map(|i| (i * 7) as u8).collect();
        buf[CODE_SIZE_OFFSET] = kbs;
        buf[0xFC..0x100].copy_from_slice(b"PRDY");
        buf[VERSION_OFFSET..VERSION_OFFSET + 2].copy_from_slice(&[0x07, 0x01]);
        let checksum = sum::sum16(&buf[..code_size - 2]);
        buf[code_size - 2..].copy_from_slice(&checksum.to_be_bytes());
        buf.resize(code_size + trailing, 0xff);
        buf
    }

    #[test]
    fn parses_and_truncates() {
        let input = Bytes::from(image(2, 0x300));
        let fw = GenesysPdFirmware
            .parse_bytes(input.clone(), 0, InstallFlags::NONE)
            .unwrap();
        assert_eq!(fw.id(), Some("PD"));
        assert_eq!(fw.idx(), 2);
        assert_eq!(fw.alignment(), Alignment::ALIGN_1K);
        assert!(fw.has_checksum());
        assert_eq!(fw.size(), 2048);
        assert_eq!(fw.bytes(), &input.slice(..2048));
        assert_eq!(fw.version(), Some("01.07"));
        assert_eq!(fw.version_raw(), 0x0107);
    }

    #[test]
    fn parses_at_offset() {
        let mut buf = vec![0u8; 0x40];
        buf.extend(image(1, 0));
        let fw = GenesysPdFirmware
            .parse_bytes(Bytes::from(buf), 0x40, InstallFlags::NONE)
            .unwrap();
        assert_eq!(fw.offset(), 0x40);
        assert_eq!(fw.size(), 1024);
    }

    #[test]
    fn corrupted_body_fails_checksum() {
        let mut buf = image(1, 0);
        buf[0x200] ^= 0x01;
        let err = GenesysPdFirmware
            .parse_bytes(Bytes::from(buf.clone()), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
        assert!(err.to_string().starts_with("not valid for pd: checksum mismatch, got 0x"));

        let fw = GenesysPdFirmware
            .parse_bytes(Bytes::from(buf), 0, InstallFlags::IGNORE_CHECKSUM)
            .unwrap();
        assert_eq!(fw.size(), 1024);
        assert_eq!(fw.version(), Some("01.07"));
    }

    #[test]
    fn zero_code_size_is_invalid() {
        let mut buf = image(1, 0);
        buf[CODE_SIZE_OFFSET] = 0;
        let err = GenesysPdFirmware
            .parse_bytes(Bytes::from(buf), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ComputeFailed);
        assert_eq!(err.to_string(), "not valid for pd: invalid codesize");
    }

    #[test]
    fn code_size_past_end_is_out_of_range() {
        let mut buf = image(1, 0);
        buf[CODE_SIZE_OFFSET] = 4;
        let err = GenesysPdFirmware
            .parse_bytes(Bytes::from(buf), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    /// Counts bytes handed out so header validation can be shown to be bounded.
    struct CountingSource {
        inner: Cursor<Vec<u8>>,
        read: usize,
    }

    impl Read for CountingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.read += n;
            Ok(n)
        }
    }

    impl Seek for CountingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn validate_reads_only_the_header() {
        let mut stream = SafeStream::new(CountingSource {
            inner: Cursor::new(image(64, 0)),
            read: 0,
        });
        GenesysPdFirmware.validate(&mut stream, 0).unwrap();
        assert_eq!(stream.get_ref().read, 0x100);
    }

    #[test]
    fn validate_rejects_other_magic() {
        let mut buf = image(1, 0);
        buf[0xFC..0x100].copy_from_slice(b"PRDX");
        let mut stream = SafeStream::new(Cursor::new(buf));
        let err = GenesysPdFirmware.validate(&mut stream, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
        assert!(err.to_string().contains("expected 'PRDY' and got 'PRDX'"));
    }
}
