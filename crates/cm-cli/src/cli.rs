//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "conceptual-modeler",
    version,
    about = "Conceptual Modeler - inspect and convert subsurface model files",
    long_about = "Work with conceptual subsurface models outside a modeling session.\n\n\
                  Inspect versioned full-model snapshots, and convert CSV input\n\
                  bundles into snapshot files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

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

#[derive(Subcommand)]
pub enum Command {
    /// Summarize a full-model snapshot file.
    Inspect(InspectArgs),

    /// Convert a CSV input bundle into a snapshot file.
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to a full-model snapshot (json).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Also list every point and orientation per surface.
    #[arg(long = "detailed")]
    pub detailed: bool,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Path to an input bundle (zip with grid/stacks/surfaces/... csv files).
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,

    /// Output snapshot path (default: <BUNDLE>.json).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
