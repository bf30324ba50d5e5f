//! Command-line argument definitions.
use std::path::PathBuf;

use clap::Parser;

/// Command-line interface of the symlink farm manager.
#[derive(Parser, Debug)]
#[command(
    name = "sym",
    about = "Link packages from a source directory into a target directory",
    version = crate::VERSION
)]
pub struct Cli {
    /// Packages to process (directories below the source root)
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Source directory holding the packages [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Target directory the links are created in [default: ..]
    #[arg(short, long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Report every per-entry decision
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would change without touching the filesystem
    #[arg(short = 'n', long)]
    pub simulate: bool,

    /// Remove links instead of creating them
    #[arg(short = 'D', long, conflicts_with = "relink")]
    pub delete: bool,

    /// Remove links, then create them again
    #[arg(short = 'R', long)]
    pub relink: bool,

    /// Settings file [default: ~/.sym.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
