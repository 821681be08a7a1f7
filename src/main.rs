mod cli;
mod config;
mod error;
mod github;
mod linter;
mod orchestrator;
mod report;
mod scan;
mod types;

use crate::error::CheckError;
use clap::Parser;
use tracing::debug;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const LINTER_UNAVAILABLE: i32 = 127;
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn run() -> Result<i32, CheckError> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let root = std::env::current_dir()?;
    let overrides = config::Overrides {
        config_path: cli.config,
        linter: cli.linter,
        linter_args: cli.linter_args,
        git: cli.git,
    };
    let run_config = config::load_config(&root, &overrides)?;
    debug!(?run_config, "configuration resolved");

    let diff = scan::git_diff::GitDiff::new(run_config.git.clone(), &root);
    let linter = linter::RubocopLinter::new(run_config.linter.clone(), run_config.linter_args.clone());
    let check_runs = github::client::GithubCheckRuns::new(&run_config)?;

    let orchestrator = orchestrator::Orchestrator::new(run_config, diff, linter, check_runs);
    Ok(orchestrator.run())
}

fn main() {
    match run() {
        Ok(code) => {
            if code != exit_code::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
