//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use logq_query::is_field_name;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The default field is empty.
    EmptyDefaultField,
    /// The default field could not be written as `field:value` in a query.
    InvalidDefaultField {
        /// The configured field name.
        field: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDefaultField => write!(f, "parser.default_field is empty"),
            Self::InvalidDefaultField { field } => {
                write!(
                    f,
                    "parser.default_field '{field}' is not a valid field name"
                )
            }
        }
    }
}

impl ConfigWarning {
    /// Returns a hint for resolving this warning.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::EmptyDefaultField => {
                "set default_field to the field bare terms should search, e.g. \"content\""
            }
            Self::InvalidDefaultField { .. } => {
                "field names start with a letter or '_' and contain letters, digits, '_', '.', '-' or '@'"
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let field = &config.parser.default_field;
    if field.is_empty() {
        warnings.push(ConfigWarning::EmptyDefaultField);
    } else if !is_field_name(field) {
        warnings.push(ConfigWarning::InvalidDefaultField {
            field: field.clone(),
        });
    }

    warnings
}
