//! Configuration loading from enumgen.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{EnumgenError, EnumgenResult, IoResultExt};
use crate::render::Granularity;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "enumgen.toml";

/// Main configuration structure for enumgen.toml.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct EnumgenConfig {
    /// Regex selecting enumeration type names.
    pub enum_name: Option<String>,
    /// Build tags, combined with those given on the command line.
    pub build_tags: Option<Vec<String>>,
    /// `KEY=VALUE` overrides, combined with those given on the command line.
    pub env_vars: Option<Vec<String>>,
    /// Skip `_test.go` files.
    pub exclude_tests: Option<bool>,
    /// "enum" or "package".
    pub granularity: Option<Granularity>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// Parses configuration text. `path` is only used in error messages.
pub fn parse_config(path: &Path, content: &str) -> EnumgenResult<EnumgenConfig> {
    toml::from_str(content)
        .map_err(|e| EnumgenError::config(path, format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))
}

/// Loads configuration from enumgen.toml in `root` if it exists.
pub fn load_config(root: &Path) -> EnumgenResult<Option<EnumgenConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads an explicitly named configuration file, which must exist.
pub fn load_config_file(path: &Path) -> EnumgenResult<EnumgenConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    parse_config(path, &content)
}
