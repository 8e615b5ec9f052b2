//! Starter files written by `logq init`.
//!
//! The settings section is produced from [`Config::default`], so a new setting shows up in
//! the template as soon as it has a default. Every setting is commented out; the file
//! changes nothing until the user uncomments a line.

use crate::{CONFIG_FILENAME, Config, ConfigError};

/// Which starter file to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// A `.logq.toml` in a project directory.
    Project,
    /// The user's `~/.logq.toml`.
    Global,
}

/// Explanations printed above each setting, keyed by setting name.
const NOTES: &[(&str, &str)] = &[
    (
        "default_field",
        "Field searched by terms that name no field, e.g. `error` or `\"get images\"`.",
    ),
    (
        "format",
        "How `logq parse` prints results: canonical, tree or json.",
    ),
];

/// Builds the commented starter configuration for `kind`.
pub fn template(kind: TemplateKind) -> Result<String, ConfigError> {
    let mut out = String::new();

    match kind {
        TemplateKind::Project => {
            out.push_str("# logq project configuration\n#\n# ");
            out.push_str(CONFIG_FILENAME);
            out.push_str(" files are read from the current directory upwards;\n");
            out.push_str("# the closest file wins.\n\n");
            out.push_str("# Stop the lookup here, ignoring parent directories and ~/");
            out.push_str(CONFIG_FILENAME);
            out.push_str(".\n# root = true\n");
        }
        TemplateKind::Global => {
            out.push_str("# logq global configuration\n#\n");
            out.push_str("# Lowest precedence: any project file overrides these values.\n");
        }
    }

    for line in Config::default().settings_to_toml()?.lines() {
        if line.starts_with('[') {
            out.push('\n');
        }
        if line.is_empty() {
            continue;
        }
        if let Some((_, note)) = NOTES
            .iter()
            .find(|(key, _)| line.split('=').next().is_some_and(|k| k.trim() == *key))
        {
            out.push_str("# ");
            out.push_str(note);
            out.push('\n');
        }
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }

    Ok(out)
}
