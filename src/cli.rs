//! Command-line argument definitions for `logshift`.
//!
//! Uses [`clap`] derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

/// Rewrite date/time stamps in a log file as offsets from the previous stamp.
///
/// The first stamp becomes `(DURATION)00:00:00`; every later stamp shows the
/// time elapsed since the one before it. Output goes to `<FILE>.Shifted`, or
/// to stdout when reading stdin.
#[derive(Debug, Parser)]
#[command(name = "logshift", version, about, long_about = None)]
pub struct Cli {
    /// Log file to process. Omit or pass `-` to read stdin.
    #[arg(value_name = "FILE", conflicts_with = "file")]
    pub input: Option<PathBuf>,

    /// Log file to process (same as the positional FILE).
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write output here instead of `<FILE><suffix>`. `-` means stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suffix appended to the input file name for the output file.
    #[arg(short = 's', long)]
    pub suffix: Option<String>,

    /// Label written in front of every offset.
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// Read ambiguous dates as day before month (`12/11/2020` is 12 November).
    #[arg(long, overrides_with = "month_first")]
    pub day_first: bool,

    /// Read ambiguous dates as month before day (the default).
    #[arg(long, overrides_with = "day_first")]
    pub month_first: bool,

    /// Read ambiguous dates with the year last (`11-12-20` is 2020).
    #[arg(long, overrides_with = "year_first")]
    pub year_last: bool,

    /// Read ambiguous dates with the year first (the default).
    #[arg(long, overrides_with = "year_last")]
    pub year_first: bool,

    /// Control color of console status text.
    #[arg(short = 'c', long, value_enum)]
    pub color: Option<ColorMode>,

    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress banner and progress output.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Log dropped and ignored stamps to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .or(self.file.as_ref())
            .filter(|p| p.as_os_str() != "-")
    }

    /// Month/day order requested on the command line, if any.
    pub const fn month_first_override(&self) -> Option<bool> {
        match (self.month_first, self.day_first) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Year position requested on the command line, if any.
    pub const fn year_first_override(&self) -> Option<bool> {
        match (self.year_first, self.year_last) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Enable colors only when stderr is a TTY.
    Auto,
    /// Always enable colors.
    Always,
    /// Never enable colors.
    Never,
}
