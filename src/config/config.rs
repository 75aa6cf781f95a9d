use clap::ValueEnum;
use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::application::data::ColorMode;
use crate::filesystem::{Namespace, NamespaceError};

const CONFIG_FILE_NAME: &str = "treefs.yaml";
const DEFAULT_PROMPT: &str = "treefs";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

fn yaml_key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Entry of the tree the namespace is pre-populated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEntry {
    File {
        name: String,
        content: String,
    },
    Directory {
        name: String,
        children: Vec<SeedEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub color: ColorMode,
    pub seed: Vec<SeedEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            color: ColorMode::default(),
            seed: Vec::new(),
        }
    }
}

impl Config {
    /// Reads `treefs.yaml` from `root`, falling back to the defaults when the
    /// file does not exist
    pub async fn read(root: &Path) -> Result<Self, ConfigError> {
        let path = get_config_file_path(root);
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Reading config file: {}", path.display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    /// Creates the seed entries under the root of `namespace` and leaves the
    /// cursor at the root. Returns the number of created entries.
    pub fn seed(&self, namespace: &mut Namespace) -> Result<usize, ConfigError> {
        let result = Self::seed_entries(&self.seed, namespace);
        // "/" always resolves
        let _ = namespace.change_directory("/");
        result
    }

    fn seed_entries(entries: &[SeedEntry], namespace: &mut Namespace) -> Result<usize, ConfigError> {
        let mut created = 0;
        for entry in entries {
            match entry {
                SeedEntry::File { name, content } => {
                    namespace
                        .create_file(name, content.as_str())
                        .context(SeedSnafu {
                            directory: namespace.current_path(),
                        })?;
                    created += 1;
                }
                SeedEntry::Directory { name, children } => {
                    namespace.create_directory(name).context(SeedSnafu {
                        directory: namespace.current_path(),
                    })?;
                    namespace.change_directory(name).context(SeedSnafu {
                        directory: namespace.current_path(),
                    })?;
                    created += 1 + Self::seed_entries(children, namespace)?;
                    namespace.change_directory("..").context(SeedSnafu {
                        directory: namespace.current_path(),
                    })?;
                }
            }
        }
        Ok(created)
    }

    fn parse_prompt(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<String, ConfigError> {
        match top_level.get(&yaml_key("prompt")) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(DEFAULT_PROMPT.to_string()),
            Some(Yaml::Value(Scalar::String(prompt))) => Ok(prompt.to_string()),
            Some(_) => InvalidValueSnafu {
                key: "prompt",
                expected: "a string",
            }
            .fail(),
        }
    }

    fn parse_color(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<ColorMode, ConfigError> {
        let invalid = InvalidValueSnafu {
            key: "color",
            expected: "one of auto, always, never",
        };
        match top_level.get(&yaml_key("color")) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(ColorMode::default()),
            Some(Yaml::Value(Scalar::Boolean(true))) => Ok(ColorMode::Always),
            Some(Yaml::Value(Scalar::Boolean(false))) => Ok(ColorMode::Never),
            Some(Yaml::Value(Scalar::String(mode))) => {
                ColorMode::from_str(mode, true).map_err(|_| invalid.build())
            }
            Some(_) => invalid.fail(),
        }
    }

    fn parse_seed(mapping: &LinkedHashMap<Yaml, Yaml>) -> Result<Vec<SeedEntry>, ConfigError> {
        mapping
            .iter()
            .map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    return InvalidValueSnafu {
                        key: "seed",
                        expected: "string entry names",
                    }
                    .fail();
                };
                let name = name.to_string();
                match value {
                    Yaml::Mapping(children) => Ok(SeedEntry::Directory {
                        name,
                        children: Self::parse_seed(children)?,
                    }),
                    Yaml::Value(Scalar::String(content)) => Ok(SeedEntry::File {
                        name,
                        content: content.to_string(),
                    }),
                    Yaml::Value(Scalar::Null) => Ok(SeedEntry::File {
                        name,
                        content: String::new(),
                    }),
                    _ => {
                        debug!("Rejecting seed entry '{}': {:?}", name, value);
                        InvalidValueSnafu {
                            key: "seed",
                            expected: "a mapping (directory), a string or nothing (file)",
                        }
                        .fail()
                    }
                }
            })
            .collect()
    }
}

impl TryFrom<&str> for Config {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let seed = match top_level.get(&yaml_key("seed")) {
            None | Some(Yaml::Value(Scalar::Null)) => Vec::new(),
            Some(Yaml::Mapping(seed)) => Self::parse_seed(seed)?,
            Some(_) => {
                return InvalidValueSnafu {
                    key: "seed",
                    expected: "a mapping",
                }
                .fail();
            }
        };

        Ok(Config {
            prompt: Self::parse_prompt(top_level)?,
            color: Self::parse_color(top_level)?,
            seed,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Invalid value for '{}': expected {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
    #[snafu(display("Failed to seed the namespace in '{}'", directory))]
    SeedError {
        directory: String,
        source: NamespaceError,
    },
}
