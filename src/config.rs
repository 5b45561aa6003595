//! Configuration management for schema comparison
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-compare.toml)
//! - Environment variables (SCHEMA_COMPARE__*)
//!
//! ## Example config file (schema-compare.toml):
//! ```toml
//! [naming]
//! suffix = "_schema.json"
//! version_separator = "_"
//!
//! [tool]
//! program = "json-diff"
//! args = []
//!
//! [report]
//! output_file = "schema_comparison_results.txt"
//! output_dir = "reports"
//! rule_width = 75
//! engine = "json-diff"
//! skip_identical_bytes = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a comparison run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    /// File naming settings
    #[serde(default)]
    pub naming: NamingConfig,

    /// External diff tool settings
    #[serde(default)]
    pub tool: ToolConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// File naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Literal suffix stripped from schema file names
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Separator appended to a version token to form a prefix
    #[serde(default = "default_version_separator")]
    pub version_separator: String,
}

/// External diff tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Program looked up on PATH
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the two file paths
    #[serde(default)]
    pub args: Vec<String>,

    /// Remediation shown when the program is missing
    #[serde(default = "default_install_hint")]
    pub install_hint: String,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default report file name
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Directory relative report paths are resolved against
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Width of the dash rule between compared pairs
    #[serde(default = "default_rule_width")]
    pub rule_width: usize,

    /// Comparison engine
    #[serde(default)]
    pub engine: Engine,

    /// Report byte-identical files as identical without running the engine
    #[serde(default = "default_true")]
    pub skip_identical_bytes: bool,
}

/// Engine producing per-pair diff text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// External `json-diff` process
    #[default]
    JsonDiff,
    /// In-process line diff of normalized JSON
    Builtin,
}

// Default value functions
fn default_suffix() -> String {
    "_schema.json".to_string()
}

fn default_version_separator() -> String {
    "_".to_string()
}

fn default_program() -> String {
    "json-diff".to_string()
}

fn default_install_hint() -> String {
    "Please install it using 'npm install -g json-diff'.".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("schema_comparison_results.txt")
}

fn default_rule_width() -> usize {
    75
}

fn default_true() -> bool {
    true
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            version_separator: default_version_separator(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            install_hint: default_install_hint(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            output_dir: None,
            rule_width: default_rule_width(),
            engine: Engine::default(),
            skip_identical_bytes: true,
        }
    }
}

impl CompareConfig {
    /// Load configuration from the default locations, with an optional file layered
    /// on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-compare.toml",
            ".schema-compare.toml",
            "config/schema-compare.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-compare") {
            let xdg_config = config_dir.config_dir().join("schema-compare.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // SCHEMA_COMPARE__REPORT__RULE_WIDTH=80 etc.
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_COMPARE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Resolve a report path against the configured output directory.
    ///
    /// Absolute paths are returned untouched.
    pub fn resolve_output(&self, requested: Option<&Path>) -> PathBuf {
        let file = requested.unwrap_or(&self.report.output_file);
        if file.is_absolute() {
            return file.to_path_buf();
        }
        match &self.report.output_dir {
            Some(dir) => dir.join(file),
            None => file.to_path_buf(),
        }
    }
}
