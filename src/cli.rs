//! CLI argument parsing for Revisar

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for lint reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "revisar")]
#[command(version)]
#[command(about = "Pure Rust C/C++ source linter with cursor-aware diagnostics", long_about = None)]
pub struct Cli {
    /// Root path of the C/C++ sources to lint (file or directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Filter lint rules (e.g., -e rules=magic_number_usage or -e rules=/^too_/)
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Show per-rule statistics summary instead of individual diagnostics
    #[arg(short = 'c', long = "summary")]
    pub statistics: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Load rule thresholds from a TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum function body length in lines (0 disables the rule)
    #[arg(long = "max-body-lines", value_name = "N")]
    pub max_body_lines: Option<u32>,

    /// Maximum parameter count per function (0 disables the rule)
    #[arg(long = "max-params", value_name = "N")]
    pub max_params: Option<u32>,

    /// Extra numbers the magic-number rule accepts (comma separated)
    #[arg(
        long = "ignore-numbers",
        value_name = "LIST",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub ignore_numbers: Vec<f64>,

    /// Dump the cursor tree of each file as JSON instead of linting
    #[arg(long = "dump-ast")]
    pub dump_ast: bool,

    /// Lint the embedded sample translation units
    #[arg(long = "self-check")]
    pub self_check: bool,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
