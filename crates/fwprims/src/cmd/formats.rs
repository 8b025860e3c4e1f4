use fwprims_firmware::FirmwareFlags;
use fwprims_formats::builtin_registry;
use serde::Serialize;

use crate::cmd::FormatsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct FormatInfo {
    name: &'static str,
    flags: Vec<&'static str>,
    auto_detect: bool,
}

#[derive(Serialize)]
struct FormatsOutput {
    schema_id: &'static str,
    formats: Vec<FormatInfo>,
}

pub fn run(_args: FormatsArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = builtin_registry();
    let formats = registry
        .iter()
        .map(|container| {
            let flags = container.firmware_flags();
            FormatInfo {
                name: container.name(),
                flags: flags.names(),
                auto_detect: !flags.contains(FirmwareFlags::NO_AUTO_DETECTION),
            }
        })
        .collect();

    let out = FormatsOutput {
        schema_id: "https://schemas.3leaps.dev/fwprims/cli/v1/formats.schema.json",
        formats,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let rows = out
                .formats
                .iter()
                .map(|f| {
                    vec![
                        f.name.to_string(),
                        f.flags.join(", "),
                        f.auto_detect.to_string(),
                    ]
                })
                .collect();
            print_table(&["NAME", "FLAGS", "AUTO-DETECT"], rows);
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for f in &out.formats {
                println!("{}", f.name);
            }
        }
    }
    Ok(SUCCESS)
}
