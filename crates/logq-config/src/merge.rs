//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::path::{Path, PathBuf};

use crate::{
    Config, OutputSettings, ParserSettings,
    parse::{RawConfig, RawOutputSettings, RawParserSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every setting the first defined value wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut parser = ParserSettings::default();
    let mut output = OutputSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.parser {
            apply_raw_parser(&mut parser, raw);
        }
        if let Some(ref raw) = parsed.config.output {
            apply_raw_output(&mut output, raw);
        }
    }

    Config {
        parser,
        output,
        files: configs.iter().map(|c| c.path.clone()).collect(),
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(Path::to_path_buf),
    }
}

/// Applies raw parser settings to result, overwriting any present values.
fn apply_raw_parser(result: &mut ParserSettings, raw: &RawParserSettings) {
    if let Some(ref v) = raw.default_field {
        result.default_field.clone_from(v);
    }
}

/// Applies raw output settings to result.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.format {
        result.format = v;
    }
}
