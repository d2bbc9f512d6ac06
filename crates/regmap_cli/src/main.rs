//! regmap CLI — command-line tooling for register-map databases.
//!
//! Provides `regmap check` for running the address-map guard checks,
//! `regmap map` for printing the flattened address map, and
//! `regmap params` for listing parameters with their resolved values.

#![warn(missing_docs)]

mod check;
mod map;
mod params;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// regmap — register-map database tooling.
#[derive(Parser, Debug)]
#[command(name = "regmap", version, about = "Register map tooling")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the address-map guard checks over a project.
    Check(CheckArgs),
    /// Print the flattened address map of a project.
    Map(MapArgs),
    /// List parameters and their per-instance resolved values.
    Params(ParamsArgs),
}

/// Arguments for the `regmap check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the project file.
    pub project: String,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `regmap map` subcommand.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Path to the project file.
    pub project: String,

    /// Output format for the address map.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Base address added to every entry.
    #[arg(short, long, default_value_t = 0, value_parser = parse_address, conflicts_with = "map")]
    pub base: u64,

    /// Flatten a named address map instead of the whole project.
    #[arg(short, long)]
    pub map: Option<String>,
}

/// Arguments for the `regmap params` subcommand.
#[derive(Parser, Debug)]
pub struct ParamsArgs {
    /// Path to the project file.
    pub project: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("invalid address '{s}'"))
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Map(ref args) => map::run(args, &global),
        Command::Params(ref args) => params::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection — checks if stdout is a terminal.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["regmap", "check", "soc.rpj.json"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.project, "soc.rpj.json");
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_map_with_base() {
        let cli = Cli::parse_from(["regmap", "map", "soc.rpj.json", "--base", "0x80000000"]);
        match cli.command {
            Command::Map(ref args) => {
                assert_eq!(args.base, 0x8000_0000);
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_map_named() {
        let cli = Cli::parse_from(["regmap", "map", "p.json", "--map", "cpu_view"]);
        match cli.command {
            Command::Map(ref args) => {
                assert_eq!(args.map.as_deref(), Some("cpu_view"));
                assert_eq!(args.base, 0);
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_map_json_format() {
        let cli = Cli::parse_from(["regmap", "map", "p.json", "--format", "json"]);
        match cli.command {
            Command::Map(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_global_quiet() {
        let cli = Cli::parse_from(["regmap", "--quiet", "params", "p.json"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Params(_)));
    }

    #[test]
    fn address_parser_accepts_both_radixes() {
        assert_eq!(parse_address("4096"), Ok(4096));
        assert_eq!(parse_address("0x1000"), Ok(0x1000));
        assert!(parse_address("zzz").is_err());
    }
}
