use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "rebase-tui",
    version,
    about = "Reorder and re-tag recent commits, then hand the result to git rebase -i"
)]
pub struct Cli {
    /// Maximum number of recent commits to load
    #[arg(short = 'n', long = "max-count", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub max_count: Option<u32>,

    /// Run git in DIR instead of the current directory
    #[arg(short = 'C', value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Git executable to run
    #[arg(long, value_name = "PROGRAM")]
    pub git: Option<String>,

    /// Configuration file (default: ~/.rebase-tui/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostics to PATH
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
