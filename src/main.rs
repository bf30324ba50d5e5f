//! Command-line entry point for `sym`.
use anyhow::{Context as _, Result};
use clap::Parser;

use sym::cli::Cli;
use sym::commands;
use sym::logging::{Logger, init_subscriber};
use sym::operations::SystemFileSystemOps;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let settings = commands::load_settings(&args)?;
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let config = commands::resolve_config(&args, &settings, &cwd)?;

    init_subscriber(config.verbose());
    let log = Logger::new();
    commands::run(&config, &SystemFileSystemOps, &log)
}
