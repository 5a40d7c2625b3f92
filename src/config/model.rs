//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, predefined answer set: question name to raw YAML value.
pub type Preset = BTreeMap<String, serde_yaml::Value>;

/// Configuration for a template source directory.
///
/// This struct represents the contents of `scaffold.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template tree root, relative to the source directory.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Questions, asked in order.
    pub questions: Vec<Question>,

    /// Derived values, evaluated in declaration order after all answers are bound.
    pub computed: Vec<ComputedFlag>,

    /// Conditional file inclusion rules.
    pub features: Vec<FeatureRule>,

    /// Globs of template files copied verbatim without rendering.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,

    /// Named answer sets for non-interactive runs.
    pub presets: BTreeMap<String, Preset>,

    /// Post-generation commands.
    #[serde(skip_serializing_if = "Hooks::is_empty")]
    pub hooks: Hooks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            questions: Vec::new(),
            computed: Vec::new(),
            features: Vec::new(),
            skip: Vec::new(),
            presets: BTreeMap::new(),
            hooks: Hooks::default(),
        }
    }
}
