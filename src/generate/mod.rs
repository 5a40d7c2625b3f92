//! Selector/Renderer pipeline.
//!
//! Generation runs in two phases so that a broken template or configuration
//! never leaves partial output behind:
//!
//! 1. [`Generator::plan`] derives computed flags, decides every template file,
//!    and renders every included path and file body in memory. Any
//!    validation-class error aborts here.
//! 2. [`write`] writes the plan to the output directory. Per-file failures are
//!    collected into a [`WriteReport`] instead of stopping the remaining writes.

mod plan;
mod write;


use crate::config::Config;
use crate::error::Result;
use crate::select::{self, FeatureSet, Inclusion};
use crate::tree::{self, TemplateFile};
use globset::GlobSet;
use std::path::PathBuf;

pub use write::{WriteOptions, WriteReport, write};

/// One file that will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Path in the template tree.
    pub template_path: String,
    /// Rendered path relative to the output directory (forward slashes).
    pub output_path: String,
    pub content: Vec<u8>,
    /// False when the content was copied verbatim (`skip` glob or non-UTF-8).
    pub rendered: bool,
    pub reason: Inclusion,
}

/// A template file left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Omission {
    /// Every matching feature rule evaluated false.
    Excluded { rules: Vec<usize> },
    /// The rendered path was empty.
    EmptyPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmittedFile {
    pub template_path: String,
    pub omission: Omission,
}

/// The in-memory result of selection and rendering.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Answers plus computed flags the plan was rendered with.
    pub scope: crate::expr::Env,
    /// Files to write, in template path order.
    pub files: Vec<PlannedFile>,
    pub omitted: Vec<OmittedFile>,
}

/// A file that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Generator for one template source directory.
///
/// Holds the configuration and the compiled feature rules; no global state.
pub struct Generator<'a> {
    config: &'a Config,
    source_dir: PathBuf,
    features: FeatureSet,
    skip: GlobSet,
}

impl<'a> Generator<'a> {
    /// Compile the configuration's feature rules and skip globs.
    pub fn new(config: &'a Config, source_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            config,
            source_dir: source_dir.into(),
            features: FeatureSet::compile(&config.features)?,
            skip: select::build_globset(&config.skip, "skip")?,
        })
    }

    /// Root directory of the template tree.
    pub fn template_root(&self) -> PathBuf {
        self.config.template_root(&self.source_dir)
    }

    fn load_tree(&self) -> Result<Vec<TemplateFile>> {
        tree::load_tree(&self.template_root())
    }

    fn is_verbatim(&self, template_path: &str) -> bool {
        self.skip.is_match(template_path)
    }
}
