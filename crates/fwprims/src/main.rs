mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fwprims", version, about = "Firmware container inspection CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parse_subcommand() {
        let cli = Cli::try_parse_from([
            "fwprims",
            "parse",
            "/tmp/image.bin",
            "--container",
            "genesys-pd",
            "--offset",
            "0x200",
            "--ignore-checksum",
        ])
        .expect("parse args should parse");

        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.offset, 0x200);
                assert_eq!(args.container.as_deref(), Some("genesys-pd"));
                assert!(args.ignore_checksum);
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_output_format_after_subcommand() {
        let cli = Cli::try_parse_from(["fwprims", "formats", "--format", "json"])
            .expect("formats args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Formats(_)));
    }

    #[test]
    fn peek_requires_offset() {
        let err = Cli::try_parse_from(["fwprims", "peek", "/tmp/image.bin"])
            .expect_err("missing offset should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_bad_offset() {
        let err = Cli::try_parse_from([
            "fwprims",
            "validate",
            "/tmp/image.bin",
            "--offset",
            "0xzz",
        ])
        .expect_err("bad offset should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_unknown_checksum_kind() {
        let err = Cli::try_parse_from([
            "fwprims",
            "checksum",
            "/tmp/image.bin",
            "--kind",
            "md5",
        ])
        .expect_err("unknown digest should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
