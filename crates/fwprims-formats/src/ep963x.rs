use bytes::Bytes;
use fwprims_firmware::{
    Alignment, FirmwareBuilder, FirmwareContainer, FirmwareError, HeaderLayout, InstallFlags,
    Result,
};
use fwprims_stream::DynStream;
use tracing::trace;

/// Every EP963x image is exactly one 4 KiB flash page.
pub const EP963_FIRMWARE_SIZE: usize = 0x1000;

pub const EP963X_FIRMWARE_HDR: HeaderLayout =
    HeaderLayout::new("EP963x firmware header", 0x15, 0x10, b"EP963");

/// Explore Semiconductor EP963x firmware image.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ep963xFirmware;

impl FirmwareContainer for Ep963xFirmware {
    fn name(&self) -> &'static str {
        "ep963x"
    }

    fn validate(&self, stream: &mut DynStream<'_>, offset: usize) -> Result<()> {
        EP963X_FIRMWARE_HDR.validate_stream(stream, offset)
    }

    /// The size check counts bytes from `offset` to the end of `fw`, so an
    /// image embedded after a prefix is judged by its own length rather than
    /// by the length of the whole input.
    fn parse(
        &self,
        fw: &Bytes,
        offset: usize,
        _flags: InstallFlags,
        firmware: &mut FirmwareBuilder,
    ) -> Result<()> {
        firmware
            .set_id("ep963x")
            .set_idx(0)
            .set_alignment(Alignment::ALIGN_1);

        let len = fw.len().saturating_sub(offset);
        trace!(len, "checking ep963x image size");
        if len != EP963_FIRMWARE_SIZE {
            return Err(FirmwareError::SizeMismatch {
                expected: EP963_FIRMWARE_SIZE,
                actual: len,
            });
        }
        Ok(())
    }
}
