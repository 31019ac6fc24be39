use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vita-pkg-rename")]
#[command(about = "Rename PS Vita PKG files after their title, title ID and region", long_about = None)]
pub struct Cli {
    /// PKG file to rename, or a directory whose .pkg files are all renamed
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print the computed names without renaming anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress progress output when renaming a directory
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
