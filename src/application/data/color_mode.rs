use clap::ValueEnum;
use supports_color::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ColorMode {
    /// Color when stdout supports it
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn is_enabled(self) -> bool {
        match self {
            ColorMode::Auto => supports_color::on(Stream::Stdout).is_some(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}
