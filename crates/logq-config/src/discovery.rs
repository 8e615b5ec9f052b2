//! Configuration file discovery.
//!
//! Every ancestor of the working directory may hold a `.logq.toml`. The walk ends at a file
//! marked `root = true`; otherwise `~/.logq.toml` is consulted last.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".logq.toml";

/// How a discovered file took part in the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// A directory config that let the walk continue upwards.
    Project,
    /// A directory config with `root = true`; nothing above it was read.
    Root,
    /// The user's `~/.logq.toml`.
    Global,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Project => "project",
            Self::Root => "root",
            Self::Global => "global",
        })
    }
}

/// A configuration file found by [`discover_config_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Location of the file.
    pub path: PathBuf,
    /// Role the file played in discovery.
    pub scope: ConfigScope,
}

/// Finds the configuration files that apply to `cwd`, highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<ConfigSource> {
    let global = global_config_path();
    let mut sources = Vec::new();

    for path in cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|path| path.is_file())
    {
        let scope = if is_root_config(&path) {
            ConfigScope::Root
        } else if global.as_ref() == Some(&path) {
            ConfigScope::Global
        } else {
            ConfigScope::Project
        };
        debug!(path = %path.display(), %scope, "found config file");
        sources.push(ConfigSource { path, scope });
        if scope == ConfigScope::Root {
            return sources;
        }
    }

    if let Some(path) = global
        && path.is_file()
        && !sources.iter().any(|source| source.path == path)
    {
        debug!(path = %path.display(), "found global config file");
        sources.push(ConfigSource {
            path,
            scope: ConfigScope::Global,
        });
    }

    sources
}

/// Returns the path to the global configuration file (`~/.logq.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}
