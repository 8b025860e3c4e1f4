use fwprims_stream::{DynStream, Endian, Result};
use serde::Serialize;

use crate::cmd::{open_stream, PeekArgs, Width};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::output::{hex, print_json, OutputFormat};

#[derive(Serialize)]
struct PeekOutput {
    file: String,
    offset: usize,
    width: u32,
    endian: &'static str,
    value: u64,
    hex: String,
}

pub fn run(args: PeekArgs, format: OutputFormat) -> CliResult<i32> {
    let mut stream = open_stream(&args.path)?;
    let endian = Endian::from(args.endian);
    let value = read_width(&mut stream, args.offset, args.width, endian).map_err(|err| {
        stream_error(
            &format!("peek {} at {}", args.path.display(), hex(args.offset)),
            err,
        )
    })?;

    let digits = (args.width.bits() / 4) as usize;
    let out = PeekOutput {
        file: args.path.display().to_string(),
        offset: args.offset,
        width: args.width.bits(),
        endian: match endian {
            Endian::Little => "le",
            Endian::Big => "be",
        },
        value,
        hex: format!("0x{value:0digits$x}"),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => println!(
            "u{}{} at {}: {} ({})",
            out.width,
            out.endian,
            hex(out.offset),
            out.hex,
            out.value
        ),
        OutputFormat::Raw => println!("{}", out.value),
    }
    Ok(SUCCESS)
}

fn read_width(
    stream: &mut DynStream<'_>,
    offset: usize,
    width: Width,
    endian: Endian,
) -> Result<u64> {
    Ok(match width {
        Width::W8 => u64::from(stream.read_u8(offset)?),
        Width::W16 => u64::from(stream.read_u16(offset, endian)?),
        Width::W24 => u64::from(stream.read_u24(offset, endian)?),
        Width::W32 => u64::from(stream.read_u32(offset, endian)?),
        Width::W64 => stream.read_u64(offset, endian)?,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fwprims_stream::{ErrorKind, SafeStream};

    use super::*;

    #[test]
    fn reads_each_width() {
        let mut stream = SafeStream::new(Cursor::new(vec![1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(read_width(&mut stream, 0, Width::W8, Endian::Little).unwrap(), 1);
        assert_eq!(
            read_width(&mut stream, 0, Width::W16, Endian::Big).unwrap(),
            0x0102
        );
        assert_eq!(
            read_width(&mut stream, 0, Width::W24, Endian::Little).unwrap(),
            0x030201
        );
        assert_eq!(
            read_width(&mut stream, 4, Width::W32, Endian::Big).unwrap(),
            0x05060708
        );
        assert_eq!(
            read_width(&mut stream, 0, Width::W64, Endian::Little).unwrap(),
            0x0807060504030201
        );
    }

    #[test]
    fn short_read_at_end() {
        let mut stream = SafeStream::new(Cursor::new(vec![0u8; 4]));
        let err = read_width(&mut stream, 3, Width::W16, Endian::Little).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PartialRead);
    }
}
