//! Command-line parsing for the World Bank analyzer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/decode/analysis code. Country and indicator arguments are resolved
//! through the `Catalog` in `app`, not here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_COUNTRY, DEFAULT_INDICATOR};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wbi", version, about = "World Bank data analyzer with AI analysis")]
pub struct Cli {
    /// Log verbosely to stderr (fetch and analysis diagnostics).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one series, print it, and optionally ask a question about it.
    Fetch(FetchArgs),
    /// List the built-in countries and indicators.
    List,
    /// Launch the interactive TUI.
    Tui(TuiArgs),
}

/// Options shared by `fetch` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Country name or code (e.g. "United Kingdom" or GBR).
    #[arg(short = 'c', long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Indicator name or code (e.g. "Population, total" or SP.POP.TOTL).
    #[arg(short = 'i', long, default_value = DEFAULT_INDICATOR)]
    pub indicator: String,

    /// First year of the range.
    #[arg(long, default_value_t = 2020)]
    pub start: i32,

    /// Last year of the range.
    #[arg(long, default_value_t = 2023)]
    pub end: i32,

    /// Maximum tokens the model may generate.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 1.0).
    #[arg(long, value_parser = parse_temperature_arg)]
    pub temperature: Option<f64>,

    /// Bedrock model id.
    #[arg(long)]
    pub model_id: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Question for the AI analysis (skipped when absent).
    #[arg(short = 'q', long)]
    pub question: Option<String>,

    /// Write the series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Pre-fill the AI question field.
    #[arg(short = 'q', long)]
    pub question: Option<String>,
}

fn parse_temperature_arg(raw: &str) -> Result<f64, String> {
    crate::config::parse_temperature(raw)
}

/// Rewrite argv so `wbi` defaults to `wbi tui`.
///
/// Rules:
/// - `wbi`                       -> `wbi tui`
/// - `wbi -c GBR ...`            -> `wbi tui -c GBR ...`
/// - `wbi --help/--version/-h`   -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "list" | "tui");
    if is_subcommand {
        return argv;
    }

    // A leading flag is treated as a TUI flag.
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
