//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use simplelog::LevelFilter;

#[derive(Parser)]
#[command(
    name = "patient-intake",
    version,
    about = "Validate patient registration submissions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Load a JSON rule table instead of the built-in form.
    #[arg(long = "rules", value_name = "FILE", global = true)]
    pub rules: Option<PathBuf>,

    /// Write logs here instead of the cache directory.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Raise log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate every field and group of a submission.
    Validate {
        #[arg(value_name = "SUBMISSION")]
        submission: PathBuf,
    },

    /// Validate a submission and print its review summary.
    Review {
        #[arg(value_name = "SUBMISSION")]
        submission: PathBuf,
    },

    /// Evaluate a single field value.
    Field { field: String, value: String },
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
