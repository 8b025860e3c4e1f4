use serde::Serialize;

use crate::cmd::{open_stream, ChecksumArgs};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::output::{hex, print_fields, print_json, OutputFormat};

#[derive(Serialize)]
struct ChecksumOutput {
    schema_id: &'static str,
    file: String,
    size: usize,
    kind: &'static str,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sum8: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sum16: Option<u16>,
}

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let context = format!("checksum {}", args.path.display());
    let mut stream = open_stream(&args.path)?;

    let size = stream.size().map_err(|err| stream_error(&context, err))?;
    let digest = stream
        .compute_checksum(args.kind)
        .map_err(|err| stream_error(&context, err))?;
    let sum8 = if args.sum8 {
        Some(
            stream
                .compute_sum8()
                .map_err(|err| stream_error(&context, err))?,
        )
    } else {
        None
    };
    let sum16 = if args.sum16 {
        Some(
            stream
                .compute_sum16()
                .map_err(|err| stream_error(&context, err))?,
        )
    } else {
        None
    };

    let out = ChecksumOutput {
        schema_id: "https://schemas.3leaps.dev/fwprims/cli/v1/checksum.schema.json",
        file: args.path.display().to_string(),
        size,
        kind: args.kind.name(),
        digest,
        sum8,
        sum16,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut fields = vec![
                ("file", out.file.clone()),
                ("size", hex(out.size)),
                (out.kind, out.digest.clone()),
            ];
            if let Some(sum8) = out.sum8 {
                fields.push(("sum8", format!("0x{sum8:02x}")));
            }
            if let Some(sum16) = out.sum16 {
                fields.push(("sum16", format!("0x{sum16:04x}")));
            }
            print_fields(&fields);
        }
        OutputFormat::Pretty => {
            println!("{}  {} ({})", out.digest, out.file, out.kind);
            if let Some(sum8) = out.sum8 {
                println!("sum8: 0x{sum8:02x}");
            }
            if let Some(sum16) = out.sum16 {
                println!("sum16: 0x{sum16:04x}");
            }
        }
        OutputFormat::Raw => println!("{}", out.digest),
    }
    Ok(SUCCESS)
}
