//! Writing a plan to the output directory.

use super::{Plan, PlannedFile, WriteFailure};
use crate::error::{Result, ScaffoldError};
use crate::fs::atomic_write;
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Overwrite files that already exist in the output directory.
    pub force: bool,
}

/// Outcome of writing a plan.
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    /// Written paths, in plan order.
    pub written: Vec<PathBuf>,
    /// Failed paths, in plan order.
    pub failures: Vec<WriteFailure>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert to a [`ScaffoldError::WriteFailed`] listing every failed path.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        if self.is_success() {
            Ok(self.written)
        } else {
            Err(ScaffoldError::WriteFailed(self.failures))
        }
    }
}

/// Write every planned file under `out_dir`.
///
/// Files are written in parallel; each worker owns a distinct output path.
/// A failure never stops the other writes. Failures are:
/// - an I/O error
/// - an output path already claimed by an earlier planned file
/// - an existing file when `options.force` is false
pub fn write(plan: &Plan, out_dir: &Path, options: WriteOptions) -> WriteReport {
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        return WriteReport {
            written: Vec::new(),
            failures: vec![WriteFailure {
                path: out_dir.to_path_buf(),
                reason: format!("failed to create output directory: {}", e),
            }],
        };
    }

    let jobs: Vec<(&PlannedFile, Option<String>)> =
        plan.files.iter().zip(find_collisions(plan)).collect();

    let outcomes: Vec<std::result::Result<PathBuf, WriteFailure>> = jobs
        .into_par_iter()
        .map(|(file, collision)| write_one(file, collision, out_dir, options))
        .collect();

    let mut report = WriteReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(path) => report.written.push(path),
            Err(failure) => report.failures.push(failure),
        }
    }

    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        out_dir = %out_dir.display(),
        "write finished"
    );
    report
}

/// For each planned file, the reason it collides with an earlier one, if any.
fn find_collisions(plan: &Plan) -> Vec<Option<String>> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    plan.files
        .iter()
        .map(|file| match owners.entry(file.output_path.as_str()) {
            Entry::Occupied(owner) => Some(format!(
                "output path collides with template '{}'",
                owner.get()
            )),
            Entry::Vacant(slot) => {
                slot.insert(&file.template_path);
                None
            }
        })
        .collect()
}

fn write_one(
    file: &PlannedFile,
    collision: Option<String>,
    out_dir: &Path,
    options: WriteOptions,
) -> std::result::Result<PathBuf, WriteFailure> {
    let path = out_dir.join(&file.output_path);

    if let Some(reason) = collision {
        return Err(WriteFailure { path, reason });
    }
    if !options.force && path.exists() {
        return Err(WriteFailure {
            path,
            reason: "file already exists (use --force to overwrite)".to_string(),
        });
    }

    match atomic_write(&path, &file.content) {
        Ok(()) => {
            debug!(path = %path.display(), template = %file.template_path, "wrote");
            Ok(path)
        }
        Err(e) => Err(WriteFailure {
            path,
            reason: e.to_string(),
        }),
    }
}
