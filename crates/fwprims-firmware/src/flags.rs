//! Bitsets passed into parsing and attached to parsed firmware.

use std::ops::{BitOr, BitOrAssign};

/// Caller-supplied options for a parse attempt.
///
/// Only [`InstallFlags::IGNORE_CHECKSUM`] is interpreted by this crate; other
/// bits are handed to formats untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstallFlags(u64);

impl InstallFlags {
    pub const NONE: Self = Self(0);
    /// Accept images the device would normally refuse.
    pub const FORCE: Self = Self(1 << 0);
    /// Skip checksum verification during parse.
    pub const IGNORE_CHECKSUM: Self = Self(1 << 1);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for InstallFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InstallFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// Static capabilities of a parsed image, fixed by the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FirmwareFlags(u64);

impl FirmwareFlags {
    pub const NONE: Self = Self(0);
    /// The image carries a checksum that parse verifies.
    pub const HAS_CHECKSUM: Self = Self(1 << 0);
    /// The format is never tried by registry detection; it must be named.
    pub const NO_AUTO_DETECTION: Self = Self(1 << 1);

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the set flags, for display.
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::HAS_CHECKSUM) {
            names.push("has-checksum");
        }
        if self.contains(Self::NO_AUTO_DETECTION) {
            names.push("no-auto-detection");
        }
        names
    }
}

impl BitOr for FirmwareFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
