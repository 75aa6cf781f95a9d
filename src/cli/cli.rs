use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorMode, LogLevel};

/// Interactive in-memory file system simulator
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory holding treefs.yaml
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Explicit config file, used instead of the one in --root
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Whether to color output, overrides the config file
    #[clap(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Command to run instead of reading commands from stdin, may be repeated
    #[clap(long = "exec", short = 'e', value_name = "COMMAND")]
    pub commands: Vec<String>,
}
