//! Configuration system for logq.
//!
//! logq uses TOML configuration files named `.logq.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.logq.toml` files
//! found, then loading `~/.logq.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
};

pub use discovery::{
    CONFIG_FILENAME, ConfigScope, ConfigSource, discover_config_files, global_config_path,
};
pub use error::ConfigError;
use logq_query::{DEFAULT_FIELD, ParserOptions};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawOutputSettings, RawParserSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{TemplateKind, template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for logq.
///
/// This represents the fully resolved configuration after merging all discovered `.logq.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parser settings.
    pub parser: ParserSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Files the configuration was loaded from, highest precedence first.
    pub files: Vec<PathBuf>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.logq.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.logq.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.logq.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files: Vec<PathBuf> = discover_config_files(cwd)
            .into_iter()
            .map(|source| source.path)
            .collect();
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same layout as a `.logq.toml` file, without `root`.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: &self.parser,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Settings that shape the parsed AST.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Field searched by terms without a field prefix.
    pub default_field: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_FIELD.to_string(),
        }
    }
}

impl ParserSettings {
    /// Returns the parser options these settings describe.
    pub fn options(&self) -> ParserOptions {
        ParserOptions {
            default_field: self.default_field.clone(),
        }
    }
}

/// Settings for printing parse results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// How parsed queries are printed.
    pub format: OutputFormat,
}

/// Output formats for parsed queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The canonical condition string.
    #[default]
    Canonical,
    /// An indented AST tree.
    Tree,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Canonical => "canonical",
            Self::Tree => "tree",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Parser settings.
    parser: &'a ParserSettings,
    /// Output settings.
    output: &'a OutputSettings,
}
