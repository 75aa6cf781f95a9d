use std::path::PathBuf;

use crate::application::data::ColorMode;
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub color: Option<ColorMode>,
    pub commands: Vec<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            config_path: cli.config,
            color: cli.color,
            commands: cli.commands,
        }
    }
}
