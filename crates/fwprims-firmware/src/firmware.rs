use bytes::Bytes;
use fwprims_stream::{ChecksumKind, StreamingHasher};

use crate::flags::FirmwareFlags;

/// Power-of-two write granularity, stored as an exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Alignment(u8);

impl Alignment {
    pub const ALIGN_1: Self = Self(0);
    pub const ALIGN_4: Self = Self(2);
    pub const ALIGN_256: Self = Self(8);
    pub const ALIGN_1K: Self = Self(10);
    pub const ALIGN_4K: Self = Self(12);
    pub const ALIGN_64K: Self = Self(16);

    const MAX_EXPONENT: u8 = 31;

    pub const fn from_exponent(exponent: u8) -> Option<Self> {
        if exponent > Self::MAX_EXPONENT {
            return None;
        }
        Some(Self(exponent))
    }

    /// `None` unless `bytes` is a power of two no larger than 2 GiB.
    pub fn from_bytes(bytes: u64) -> Option<Self> {
        if !bytes.is_power_of_two() {
            return None;
        }
        Self::from_exponent(bytes.trailing_zeros() as u8)
    }

    pub const fn exponent(self) -> u8 {
        self.0
    }

    pub const fn bytes(self) -> u64 {
        1u64 << self.0
    }

    pub const fn is_aligned(self, value: u64) -> bool {
        value & (self.bytes() - 1) == 0
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.bytes())
    }
}

/// A parsed firmware image.
///
/// Only produced by a successful parse; fields are read-only afterwards.
/// The payload is a reference-counted view into the buffer handed to parse,
/// so no copy is made when a format truncates the image.
#[derive(Debug, Clone)]
pub struct Firmware {
    id: Option<String>,
    idx: u64,
    offset: usize,
    bytes: Bytes,
    alignment: Alignment,
    flags: FirmwareFlags,
    version: Option<String>,
    version_raw: u64,
}

impl Firmware {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn idx(&self) -> u64 {
        self.idx
    }

    /// Offset of the image inside the parsed input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The retained payload.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn flags(&self) -> FirmwareFlags {
        self.flags
    }

    pub fn has_checksum(&self) -> bool {
        self.flags.contains(FirmwareFlags::HAS_CHECKSUM)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn version_raw(&self) -> u64 {
        self.version_raw
    }

    /// Hex digest of the retained payload.
    pub fn checksum(&self, kind: ChecksumKind) -> String {
        let mut hasher = StreamingHasher::new(kind);
        hasher.update(&self.bytes);
        hasher.finalize()
    }
}

/// Mutable staging area a format fills in during parse.
#[derive(Debug, Clone, Default)]
pub struct FirmwareBuilder {
    id: Option<String>,
    idx: u64,
    offset: usize,
    bytes: Bytes,
    alignment: Alignment,
    flags: FirmwareFlags,
    version: Option<String>,
    version_raw: u64,
}

impl FirmwareBuilder {
    /// Start an empty image carrying the format's static flags.
    pub fn new(flags: FirmwareFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn set_idx(&mut self, idx: u64) -> &mut Self {
        self.idx = idx;
        self
    }

    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_bytes(&mut self, bytes: Bytes) -> &mut Self {
        self.bytes = bytes;
        self
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = alignment;
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    pub fn set_version_raw(&mut self, version_raw: u64) -> &mut Self {
        self.version_raw = version_raw;
        self
    }

    /// Payload as currently staged.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn flags(&self) -> FirmwareFlags {
        self.flags
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn version_raw(&self) -> u64 {
        self.version_raw
    }

    pub fn build(self) -> Firmware {
        Firmware {
            id: self.id,
            idx: self.idx,
            offset: self.offset,
            bytes: self.bytes,
            alignment: self.alignment,
            flags: self.flags,
            version: self.version,
            version_raw: self.version_raw,
        }
    }
}
