//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mwb_core::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(
    name = "mwb",
    version,
    about = "Retrieve and prepare Metabolomics Workbench study datatables",
    long_about = "Retrieve study analysis datatables from the Metabolomics Workbench REST \
                  service or load them from local files.\n\n\
                  Tables are normalized into sample, class, class code and feature columns, \
                  feature values are coerced to numbers, and missing values are processed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow sample keys and values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Retrieve analyses and datatables for one or more study IDs.
    Retrieve(RetrieveArgs),

    /// Load datatables from local files.
    Upload(UploadArgs),

    /// List the supported missing-value methods.
    Methods,
}

#[derive(Args)]
pub struct RetrieveArgs {
    /// Study IDs, e.g. ST000001 ST000002.
    #[arg(value_name = "STUDY_IDS", required = true)]
    pub study_ids: Vec<String>,

    /// REST base URL.
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Datatable files; `.txt`/`.tsv` are tab separated, others comma separated.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Missing-value method (see `mwb methods`).
    #[arg(long = "missing-values", value_name = "METHOD")]
    pub missing_values: Option<String>,

    /// Minimum number of classes an analysis needs to be summarized.
    #[arg(long = "min-class-count", value_name = "N")]
    pub min_class_count: Option<usize>,

    /// Render a preview of each datatable.
    #[arg(long = "show-tables")]
    pub show_tables: bool,

    /// List class information for one analysis, as STUDY/ANALYSIS.
    #[arg(long = "class-info", value_name = "STUDY/ANALYSIS")]
    pub class_info: Option<String>,

    /// Write each datatable as CSV plus an HTML page of download links.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
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
