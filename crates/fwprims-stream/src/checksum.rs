use std::str::FromStr;

use crc32fast::Hasher as Crc32Hasher;
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};

use crate::error::StreamError;

/// Digest algorithms available for whole-stream checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumKind {
    Sha1,
    #[default]
    Sha256,
    Sha512,
    /// Non-cryptographic, for quick integrity checks.
    Crc32,
}

impl ChecksumKind {
    pub fn name(self) -> &'static str {
        match self {
            ChecksumKind::Sha1 => "SHA-1",
            ChecksumKind::Sha256 => "SHA-256",
            ChecksumKind::Sha512 => "SHA-512",
            ChecksumKind::Crc32 => "CRC32",
        }
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(self) -> usize {
        match self {
            ChecksumKind::Sha1 => 40,
            ChecksumKind::Sha256 => 64,
            ChecksumKind::Sha512 => 128,
            ChecksumKind::Crc32 => 8,
        }
    }
}

impl FromStr for ChecksumKind {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(ChecksumKind::Sha1),
            "sha256" | "sha-256" => Ok(ChecksumKind::Sha256),
            "sha512" | "sha-512" => Ok(ChecksumKind::Sha512),
            "crc32" | "crc-32" => Ok(ChecksumKind::Crc32),
            _ => Err(StreamError::UnsupportedChecksum(s.to_string())),
        }
    }
}

/// Incremental digest state, updated once per fold window.
pub enum StreamingHasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Crc32(Crc32Hasher),
}

impl StreamingHasher {
    pub fn new(kind: ChecksumKind) -> Self {
        match kind {
            ChecksumKind::Sha1 => StreamingHasher::Sha1(Sha1::new()),
            ChecksumKind::Sha256 => StreamingHasher::Sha256(Sha256::new()),
            ChecksumKind::Sha512 => StreamingHasher::Sha512(Sha512::new()),
            ChecksumKind::Crc32 => StreamingHasher::Crc32(Crc32Hasher::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            StreamingHasher::Sha1(h) => h.update(data),
            StreamingHasher::Sha256(h) => h.update(data),
            StreamingHasher::Sha512(h) => h.update(data),
            StreamingHasher::Crc32(h) => h.update(data),
        }
    }

    /// Consume the hasher and return the lowercase hex digest.
    pub fn finalize(self) -> String {
        match self {
            StreamingHasher::Sha1(h) => hex::encode(h.finalize()),
            StreamingHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamingHasher::Sha512(h) => hex::encode(h.finalize()),
            StreamingHasher::Crc32(h) => format!("{:08x}", h.finalize()),
        }
    }
}
