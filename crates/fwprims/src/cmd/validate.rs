use fwprims_firmware::ContainerConfig;
use fwprims_formats::builtin_registry_with_config;
use serde::Serialize;

use crate::cmd::{open_stream, ValidateArgs};
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex, print_json, OutputFormat};

#[derive(Serialize)]
struct ValidateOutput {
    schema_id: &'static str,
    file: String,
    offset: usize,
    matches: Vec<&'static str>,
    valid: bool,
}

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let mut stream = open_stream(&args.path)?;
    let registry = builtin_registry_with_config(ContainerConfig {
        stop_on_first_match: false,
        ..ContainerConfig::default()
    });
    let matches = registry.detect(&mut stream, args.offset);

    let out = ValidateOutput {
        schema_id: "https://schemas.3leaps.dev/fwprims/cli/v1/validate-report.schema.json",
        file: args.path.display().to_string(),
        offset: args.offset,
        valid: !matches.is_empty(),
        matches,
    };
    print_validate(&out, format);

    if out.valid {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn print_validate(out: &ValidateOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table | OutputFormat::Pretty => {
            if out.valid {
                println!(
                    "{} at {}: {}",
                    out.file,
                    hex(out.offset),
                    out.matches.join(", ")
                );
            } else {
                println!("{} at {}: no known format", out.file, hex(out.offset));
            }
        }
        OutputFormat::Raw => {
            for name in &out.matches {
                println!("{name}");
            }
        }
    }
}
