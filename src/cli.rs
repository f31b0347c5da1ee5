//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mybckchk")]
#[command(about = "MySQL backend checker with an HTTP health endpoint", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(long, default_value = "mybckchk.cfg")]
    pub cfg: PathBuf,

    /// Debug messages
    #[arg(long)]
    pub debug: bool,

    /// Always report the backend as available
    #[arg(long)]
    pub enable: bool,

    /// Always report the backend as unavailable
    #[arg(long)]
    pub disable: bool,
}
