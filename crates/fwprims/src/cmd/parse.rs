use fwprims_firmware::{Firmware, InstallFlags};
use fwprims_formats::builtin_registry;
use fwprims_stream::ChecksumKind;
use serde::Serialize;

use crate::cmd::{open_stream, ParseArgs};
use crate::exit::{firmware_error, CliResult, SUCCESS};
use crate::output::{hex, print_fields, print_json, print_raw, OutputFormat};

#[derive(Serialize)]
struct FirmwareOutput {
    schema_id: &'static str,
    file: String,
    id: Option<String>,
    idx: u64,
    offset: usize,
    size: usize,
    alignment: u64,
    version: Option<String>,
    version_raw: u64,
    flags: Vec<&'static str>,
    sha256: String,
}

impl FirmwareOutput {
    fn new(file: String, fw: &Firmware) -> Self {
        Self {
            schema_id: "https://schemas.3leaps.dev/fwprims/cli/v1/firmware-parsed.schema.json",
            file,
            id: fw.id().map(str::to_string),
            idx: fw.idx(),
            offset: fw.offset(),
            size: fw.size(),
            alignment: fw.alignment().bytes(),
            version: fw.version().map(str::to_string),
            version_raw: fw.version_raw(),
            flags: fw.flags().names(),
            sha256: fw.checksum(ChecksumKind::Sha256),
        }
    }
}

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let mut flags = InstallFlags::NONE;
    if args.ignore_checksum {
        flags |= InstallFlags::IGNORE_CHECKSUM;
    }
    if args.force {
        flags |= InstallFlags::FORCE;
    }

    let mut stream = open_stream(&args.path)?;
    let registry = builtin_registry();
    let context = format!("parse {}", args.path.display());
    let fw = match args.container.as_deref() {
        Some(name) => registry.parse_stream_as(name, &mut stream, args.offset, flags),
        None => registry.parse_stream(&mut stream, args.offset, flags),
    }
    .map_err(|err| firmware_error(&context, err))?;

    if let OutputFormat::Raw = format {
        print_raw(fw.bytes());
        return Ok(SUCCESS);
    }

    let out = FirmwareOutput::new(args.path.display().to_string(), &fw);
    print_firmware(&out, format);
    Ok(SUCCESS)
}

fn print_firmware(out: &FirmwareOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let fields = [
                ("id", out.id.clone().unwrap_or_default()),
                ("idx", out.idx.to_string()),
                ("offset", hex(out.offset)),
                ("size", hex(out.size)),
                ("alignment", hex(out.alignment)),
                ("version", out.version.clone().unwrap_or_default()),
                ("version_raw", hex(out.version_raw)),
                ("flags", out.flags.join(", ")),
                ("sha256", out.sha256.clone()),
            ];
            print_fields(&fields);
        }
        OutputFormat::Pretty => {
            println!("Firmware:");
            println!("  File:      {}", out.file);
            println!("  Id:        {}", out.id.as_deref().unwrap_or("unknown"));
            println!("  Index:     {}", out.idx);
            println!("  Offset:    {}", hex(out.offset));
            println!("  Size:      {} ({} bytes)", hex(out.size), out.size);
            println!("  Alignment: {}", hex(out.alignment));
            match &out.version {
                Some(version) => println!("  Version:   {version} ({})", hex(out.version_raw)),
                None => println!("  Version:   unknown"),
            }
            if out.flags.is_empty() {
                println!("  Flags:     none");
            } else {
                println!("  Flags:     {}", out.flags.join(", "));
            }
            println!("  SHA-256:   {}", out.sha256);
        }
        OutputFormat::Raw => {}
    }
}
