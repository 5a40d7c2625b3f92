//! Config loading, validation, and lookup operations.

use super::model::{Config, Preset};
use super::types::Question;
use super::validation;
use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};

/// File name of the configuration inside a template source directory.
pub const CONFIG_FILE: &str = "scaffold.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and statically validated config
    /// * `Err(ScaffoldError::UserError)` - The file could not be read or parsed
    /// * `Err(ScaffoldError::ConfigValidation)` - Static analysis failed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load `scaffold.yaml` from a template source directory.
    pub fn load_from_dir<P: AsRef<Path>>(source_dir: P) -> Result<Self> {
        let source_dir = source_dir.as_ref();
        if !source_dir.is_dir() {
            return Err(ScaffoldError::UserError(format!(
                "template source '{}' is not a directory",
                source_dir.display()
            )));
        }
        Self::load(source_dir.join(CONFIG_FILE))
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                ScaffoldError::UserError(format!("failed to parse {}: {}", CONFIG_FILE, e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ScaffoldError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Statically validate the configuration.
    ///
    /// Runs before any answer is requested. Detects undefined and cyclic
    /// references among questions, computed flags, feature rules, and hooks,
    /// bad globs and regexes, and ill-typed defaults and presets.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Look up a question by name.
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.name == name)
    }

    /// Look up a preset by name.
    pub fn preset(&self, name: &str) -> Result<&Preset> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            ScaffoldError::UserError(if known.is_empty() {
                format!("unknown preset '{}': no presets are defined", name)
            } else {
                format!(
                    "unknown preset '{}' (available: {})",
                    name,
                    known.join(", ")
                )
            })
        })
    }

    /// Root of the template tree for a given source directory.
    pub fn template_root(&self, source_dir: &Path) -> PathBuf {
        source_dir.join(&self.template_dir)
    }
}
