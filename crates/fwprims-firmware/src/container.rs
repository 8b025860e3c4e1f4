use std::io::Cursor;

use bytes::Bytes;
use fwprims_stream::{DynStream, SafeStream, StreamError};
use tracing::{debug, trace};

use crate::config::ContainerConfig;
use crate::error::{FirmwareError, Result};
use crate::firmware::{Firmware, FirmwareBuilder};
use crate::flags::{FirmwareFlags, InstallFlags};

/// A binary firmware image format.
///
/// Formats are stateless: all per-image state lives in the
/// [`FirmwareBuilder`] passed to [`parse`](Self::parse). Detection calls
/// [`validate`](Self::validate) on many candidates, so it must stay cheap
/// and only read the format's fixed header.
pub trait FirmwareContainer: Send + Sync {
    /// Short stable name, also used as the registry key.
    fn name(&self) -> &'static str;

    /// Capabilities every image of this format has.
    fn firmware_flags(&self) -> FirmwareFlags {
        FirmwareFlags::NONE
    }

    /// Check that a header of this format starts at `offset`.
    fn validate(&self, stream: &mut DynStream<'_>, offset: usize) -> Result<()>;

    /// Decode the image in `fw` starting at `offset` into `firmware`.
    ///
    /// `firmware` arrives with the static flags set and the payload defaulted
    /// to `fw[offset..]`; a format that knows the real image size replaces it.
    fn parse(
        &self,
        fw: &Bytes,
        offset: usize,
        flags: InstallFlags,
        firmware: &mut FirmwareBuilder,
    ) -> Result<()>;

    /// Validate and parse an in-memory image.
    fn parse_bytes(&self, fw: Bytes, offset: usize, flags: InstallFlags) -> Result<Firmware> {
        let mut stream = SafeStream::new(Cursor::new(fw.clone()));
        self.validate(&mut stream, offset)?;
        parse_validated(self, fw, offset, flags)
    }

    /// Validate the header in `stream`, then read the whole stream and parse it.
    fn parse_stream(
        &self,
        stream: &mut DynStream<'_>,
        offset: usize,
        flags: InstallFlags,
        config: &ContainerConfig,
    ) -> Result<Firmware> {
        self.validate(stream, offset)?;
        trace!(format = self.name(), offset, "header validated");

        let size = stream.size()?;
        if size > config.max_firmware_size {
            return Err(FirmwareError::TooLarge {
                size,
                max: config.max_firmware_size,
            });
        }
        let fw = stream.read_bytes(0, size)?;
        parse_validated(self, fw, offset, flags)
    }
}

fn parse_validated<C: FirmwareContainer + ?Sized>(
    container: &C,
    fw: Bytes,
    offset: usize,
    flags: InstallFlags,
) -> Result<Firmware> {
    if offset > fw.len() {
        return Err(StreamError::OutOfRange {
            offset,
            count: 0,
            capacity: fw.len(),
        }
        .into());
    }

    let mut builder = FirmwareBuilder::new(container.firmware_flags());
    builder.set_offset(offset).set_bytes(fw.slice(offset..));
    container.parse(&fw, offset, flags, &mut builder)?;

    let firmware = builder.build();
    debug!(
        format = container.name(),
        offset,
        size = firmware.size(),
        version = firmware.version().unwrap_or("unknown"),
        "parsed firmware"
    );
    Ok(firmware)
}

#[cfg(test)]
mod tests {
    use fwprims_stream::{mem, Endian, ErrorKind};

    use super::*;
    use crate::firmware::Alignment;
    use crate::header::HeaderLayout;

    const TLV_HEADER: HeaderLayout = HeaderLayout::new("tlv header", 4, 0, b"TL");

    /// "TL" magic, u16 LE payload length, payload.
    struct Tlv;

    impl FirmwareContainer for Tlv {
        fn name(&self) -> &'static str {
            "tlv"
        }

        fn validate(&self, stream: &mut DynStream<'_>, offset: usize) -> Result<()> {
            TLV_HEADER.validate_stream(stream, offset)
        }

        fn parse(
            &self,
            fw: &Bytes,
            offset: usize,
            _flags: InstallFlags,
            firmware: &mut FirmwareBuilder,
        ) -> Result<()> {
            firmware.set_id("tlv").set_alignment(Alignment::ALIGN_4);
            let len = usize::from(mem::read_u16(fw, offset + 2, Endian::Little)?);
            if len == 0 {
                return Err(FirmwareError::Compute("empty payload".into()));
            }
            mem::check_read(fw.len(), offset + 4, len)?;
            firmware.set_bytes(fw.slice(offset + 4..offset + 4 + len));
            Ok(())
        }
    }

    fn tlv(payload: &[u8]) -> Vec<u8> {
        let mut buf = b"TL".to_vec();
        buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn parse_bytes_validates_then_parses() {
        let mut input = vec![0xee; 3];
        input.extend(tlv(b"abc"));
        input.extend_from_slice(b"trailing");

        let fw = Tlv.parse_bytes(Bytes::from(input), 3, InstallFlags::NONE).unwrap();
        assert_eq!(fw.id(), Some("tlv"));
        assert_eq!(fw.offset(), 3);
        assert_eq!(fw.bytes().as_ref(), b"abc");
        assert_eq!(fw.alignment(), Alignment::ALIGN_4);
    }

    #[test]
    fn validate_failure_stops_before_parse() {
        let err = Tlv
            .parse_bytes(Bytes::from_static(b"XX\x03\x00abc"), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
    }

    #[test]
    fn parse_failure_returns_no_firmware() {
        let err = Tlv
            .parse_bytes(Bytes::from(tlv(b"")), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ComputeFailed);

        let mut short = tlv(b"abcdef");
        short.truncate(7);
        let err = Tlv
            .parse_bytes(Bytes::from(short), 0, InstallFlags::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn parse_stream_reads_whole_source() {
        let mut stream = SafeStream::new(Cursor::new(tlv(b"payload")));
        let fw = Tlv
            .parse_stream(
                &mut stream,
                0,
                InstallFlags::NONE,
                &ContainerConfig::default(),
            )
            .unwrap();
        assert_eq!(fw.bytes().as_ref(), b"payload");
    }

    #[test]
    fn parse_stream_enforces_size_limit() {
        let mut stream = SafeStream::new(Cursor::new(tlv(&[0u8; 64])));
        let config = ContainerConfig {
            max_firmware_size: 16,
            ..ContainerConfig::default()
        };
        let err = Tlv
            .parse_stream(&mut stream, 0, InstallFlags::NONE, &config)
            .unwrap_err();
        assert!(matches!(err, FirmwareError::TooLarge { size: 68, max: 16 }));
    }

    #[test]
    fn offset_past_end_is_out_of_range() {
        let fw = Bytes::from(tlv(b"x"));
        let err = parse_validated(&Tlv, fw, 64, InstallFlags::NONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn default_payload_is_tail_from_offset() {
        struct Passthrough;

        impl FirmwareContainer for Passthrough {
            fn name(&self) -> &'static str {
                "passthrough"
            }

            fn firmware_flags(&self) -> FirmwareFlags {
                FirmwareFlags::HAS_CHECKSUM
            }

            fn validate(&self, _stream: &mut DynStream<'_>, _offset: usize) -> Result<()> {
                Ok(())
            }

            fn parse(
                &self,
                _fw: &Bytes,
                _offset: usize,
                _flags: InstallFlags,
                _firmware: &mut FirmwareBuilder,
            ) -> Result<()> {
                Ok(())
            }
        }

        let fw = Passthrough
            .parse_bytes(Bytes::from_static(b"0123456789"), 4, InstallFlags::NONE)
            .unwrap();
        assert_eq!(fw.bytes().as_ref(), b"456789");
        assert!(fw.has_checksum());
    }
}
