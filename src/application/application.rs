use std::io::{self, Cursor};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;
use tracing::info;

use crate::application::RuntimeConfig;
use crate::config::{Config, ConfigError};
use crate::filesystem::Namespace;
use crate::shell::{Shell, ShellError, ShellSettings};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = match &app_config.config_path {
            Some(path) => Config::from_path(path.clone()).await,
            None => Config::read(&app_config.root).await,
        }
        .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let mut namespace = Namespace::new();
        let seeded = config.seed(&mut namespace).context(ConfigSnafu)?;
        info!("Seeded namespace with {} entries", seeded);

        let color = app_config.color.unwrap_or(config.color);
        let color_enabled = color.is_enabled();
        debug!("Color mode {:?} resolved to {}", color, color_enabled);
        colored::control::set_override(color_enabled);

        let interactive = app_config.commands.is_empty();
        let settings = ShellSettings {
            prompt: config.prompt,
            interactive,
        };
        let stdout = io::stdout().lock();

        if interactive {
            Shell::new(io::stdin().lock(), stdout, settings)
                .run(&mut namespace)
                .context(ShellSnafu)?;
        } else {
            // Lines after a content-reading command are consumed as its content
            let script = app_config.commands.join("\n");
            Shell::new(Cursor::new(script), stdout, settings)
                .run(&mut namespace)
                .context(ShellSnafu)?;
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Critical failure encountered while running the shell"))]
    ShellError { source: ShellError },
}
