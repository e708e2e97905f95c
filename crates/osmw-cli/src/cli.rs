//! CLI argument definitions for osm-wrangle.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "osm-wrangle",
    version,
    about = "Audit and normalize an OpenStreetMap XML extract into JSON documents",
    long_about = "Audit and normalize an OpenStreetMap XML extract.\n\n\
                  Runs two passes over the input: the first tallies tag, key,\n\
                  postal-code, and street-token distributions; the second builds\n\
                  normalized JSON documents and inserts them into a JSON-lines\n\
                  collection, capturing any records that fail to insert."
)]
pub struct Cli {
    /// Path to the OSM XML extract.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for generated files (default: next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the document array and audit log but skip the collection insert.
    #[arg(long = "skip-insert")]
    pub skip_insert: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
