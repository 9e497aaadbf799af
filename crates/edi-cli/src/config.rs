//! Generator configuration
//!
//! Values come from an optional YAML file; command-line flags override them.

use anyhow::Context;
use edi_jsonschema::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Edition (or `all`) to generate when none is given on the command line
    pub edition: Option<String>,
    /// Root of the mapping package holding `<EDITION>/segments.xml` etc.
    pub mapping_dir: PathBuf,
    /// Directory the `<EDITION>/` output trees are created in
    pub output_dir: PathBuf,
    /// Root URL used for `$id` and `$ref`
    pub base_url: String,
    /// Stop at the first failed edition instead of continuing the batch
    pub fail_fast: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            edition: None,
            mapping_dir: PathBuf::from("mapping"),
            output_dir: PathBuf::from("."),
            base_url: DEFAULT_BASE_URL.to_string(),
            fail_fast: false,
        }
    }
}

/// Overrides taken from the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub edition: Option<String>,
    pub mapping_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub fail_fast: bool,
}

impl GeneratorConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse a configuration from YAML
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(edition) = overrides.edition {
            self.edition = Some(edition);
        }
        if let Some(mapping_dir) = overrides.mapping_dir {
            self.mapping_dir = mapping_dir;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        self.fail_fast |= overrides.fail_fast;
        self
    }
}
