use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rubocop-check",
    version,
    about = "Run RuboCop and report its offenses as a GitHub check run"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (defaults to rubocop-check.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Linter executable
    #[arg(long)]
    pub linter: Option<String>,

    /// Git executable used for changes-only mode
    #[arg(long)]
    pub git: Option<String>,

    /// Extra arguments passed to the linter before the file list
    #[arg(last = true)]
    pub linter_args: Vec<String>,
}
