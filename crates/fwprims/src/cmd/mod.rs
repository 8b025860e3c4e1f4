use clap::{Args, Subcommand, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};

use fwprims_stream::{ChecksumKind, Endian, SafeStream};

use crate::exit::{stream_error, CliResult};
use crate::output::OutputFormat;

pub mod checksum;
pub mod formats;
pub mod parse;
pub mod peek;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a firmware image and print its metadata.
    Parse(ParseArgs),
    /// Check which formats accept the header at an offset.
    Validate(ValidateArgs),
    /// Digest a whole file in fixed-size chunks.
    Checksum(ChecksumArgs),
    /// Read one integer at an offset.
    Peek(PeekArgs),
    /// List built-in firmware formats.
    Formats(FormatsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Parse(args) => parse::run(args, format),
        Command::Validate(args) => validate::run(args, format),
        Command::Checksum(args) => checksum::run(args, format),
        Command::Peek(args) => peek::run(args, format),
        Command::Formats(args) => formats::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Firmware image to parse.
    pub path: PathBuf,
    /// Parse as this format instead of detecting it.
    #[arg(long, value_name = "NAME")]
    pub container: Option<String>,
    /// Offset of the image inside the file (decimal or 0x hex).
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    pub offset: usize,
    /// Skip checksum verification.
    #[arg(long)]
    pub ignore_checksum: bool,
    /// Accept images the device would normally refuse.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Firmware image to check.
    pub path: PathBuf,
    /// Offset of the header inside the file (decimal or 0x hex).
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    pub offset: usize,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// File to digest.
    pub path: PathBuf,
    /// Digest algorithm: sha1, sha256, sha512 or crc32.
    #[arg(long, default_value = "sha256")]
    pub kind: ChecksumKind,
    /// Also report the 8-bit byte sum.
    #[arg(long)]
    pub sum8: bool,
    /// Also report the 16-bit byte sum.
    #[arg(long)]
    pub sum16: bool,
}

#[derive(Args, Debug)]
pub struct PeekArgs {
    /// File to read from.
    pub path: PathBuf,
    /// Byte offset to read at (decimal or 0x hex).
    #[arg(long, value_parser = parse_offset)]
    pub offset: usize,
    /// Integer width in bits.
    #[arg(long, default_value = "8")]
    pub width: Width,
    /// Byte order of multi-byte integers.
    #[arg(long, default_value = "le")]
    pub endian: EndianArg,
}

#[derive(Args, Debug, Default)]
pub struct FormatsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Width {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "24")]
    W24,
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W24 => 24,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EndianArg {
    Le,
    Be,
}

impl From<EndianArg> for Endian {
    fn from(arg: EndianArg) -> Self {
        match arg {
            EndianArg::Le => Endian::Little,
            EndianArg::Be => Endian::Big,
        }
    }
}

/// Parse a byte offset written in decimal or with a `0x` prefix.
pub fn parse_offset(input: &str) -> Result<usize, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid offset: {input}"))
}

pub fn open_stream(path: &Path) -> CliResult<SafeStream<File>> {
    SafeStream::open(path).map_err(|err| stream_error("input", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_offset_decimal_and_hex() {
        assert_eq!(parse_offset("0").unwrap(), 0);
        assert_eq!(parse_offset("4096").unwrap(), 4096);
        assert_eq!(parse_offset("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_offset("0XfB").unwrap(), 0xfb);
        assert_eq!(parse_offset(" 16 ").unwrap(), 16);
    }

    #[test]
    fn parse_offset_invalid() {
        assert!(parse_offset("").is_err());
        assert!(parse_offset("0x").is_err());
        assert!(parse_offset("-1").is_err());
        assert!(parse_offset("12k").is_err());
    }

    #[test]
    fn width_bits() {
        assert_eq!(Width::W24.bits(), 24);
        assert_eq!(Endian::from(EndianArg::Be), Endian::Big);
    }
}
