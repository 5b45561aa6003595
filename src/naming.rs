//! Schema file naming
//!
//! A schema file name is `<prefix><identifier><suffix>`, e.g. `v1_user_schema.json`
//! with prefix `v1_` and suffix `_schema.json` carries identifier `user`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// Prefix/suffix rule for one side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNaming {
    /// Required leading string; files without it are ignored
    pub prefix: String,
    /// Trailing string removed when present
    pub suffix: String,
}

impl SchemaNaming {
    /// Create a naming rule
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Whether a file name belongs to this side
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix)
    }

    /// Derive the schema identifier for a file name.
    ///
    /// Returns `None` when the name does not start with the prefix.
    pub fn identifier(&self, file_name: &str) -> Option<String> {
        if !self.matches(file_name) {
            return None;
        }
        Some(self.strip(file_name).to_string())
    }

    /// Remove the prefix and the suffix, each at most once and only when present
    fn strip<'a>(&self, value: &'a str) -> &'a str {
        let rest = value.strip_prefix(self.prefix.as_str()).unwrap_or(value);
        if self.suffix.is_empty() {
            return rest;
        }
        rest.strip_suffix(self.suffix.as_str()).unwrap_or(rest)
    }
}

/// How the two sides of a comparison are located and named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convention {
    /// Both directories and prefixes given independently
    Explicit {
        first_directory: PathBuf,
        second_directory: PathBuf,
        first_prefix: String,
        second_prefix: String,
    },
    /// Second directory and both prefixes derived from version tokens
    VersionSubstitution {
        first_directory: PathBuf,
        version: String,
        next_version: String,
    },
}

/// A fully resolved side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub directory: PathBuf,
    pub naming: SchemaNaming,
}

impl Side {
    pub fn new(directory: impl Into<PathBuf>, naming: SchemaNaming) -> Self {
        Self {
            directory: directory.into(),
            naming,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.naming.prefix
    }
}

impl Convention {
    /// Resolve both sides using the shared suffix and version separator
    pub fn resolve(&self, suffix: &str, separator: &str) -> Result<(Side, Side)> {
        match self {
            Convention::Explicit {
                first_directory,
                second_directory,
                first_prefix,
                second_prefix,
            } => Ok((
                Side::new(first_directory, SchemaNaming::new(first_prefix, suffix)),
                Side::new(second_directory, SchemaNaming::new(second_prefix, suffix)),
            )),
            Convention::VersionSubstitution {
                first_directory,
                version,
                next_version,
            } => {
                let second_directory = substitute_version(first_directory, version, next_version)?;
                Ok((
                    Side::new(
                        first_directory,
                        SchemaNaming::new(format!("{version}{separator}"), suffix),
                    ),
                    Side::new(
                        second_directory,
                        SchemaNaming::new(format!("{next_version}{separator}"), suffix),
                    ),
                ))
            }
        }
    }
}

/// Replace every occurrence of `version` in a directory path with `next_version`
pub fn substitute_version(directory: &Path, version: &str, next_version: &str) -> Result<PathBuf> {
    if version.is_empty() || next_version.is_empty() {
        return Err(CompareError::InvalidConvention(
            "version tokens must not be empty".to_string(),
        ));
    }
    if version == next_version {
        return Err(CompareError::InvalidConvention(format!(
            "version '{}' and next version are identical",
            version
        )));
    }

    let original = directory.to_string_lossy();
    if !original.contains(version) {
        return Err(CompareError::InvalidConvention(format!(
            "version '{}' does not occur in directory '{}'",
            version, original
        )));
    }

    Ok(PathBuf::from(original.replace(version, next_version)))
}
