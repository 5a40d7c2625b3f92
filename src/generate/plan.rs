//! Selection and in-memory rendering.

use super::{Generator, OmittedFile, Omission, Plan, PlannedFile};
use crate::computed;
use crate::error::{Result, ScaffoldError};
use crate::expr::{Env, Scope};
use crate::select::Decision;
use crate::template::Template;
use tracing::{debug, info};

impl Generator<'_> {
    /// Select and render every template file against `answers`.
    ///
    /// Nothing is written. Any [`ScaffoldError`] returned here is
    /// validation-class and aborts the run.
    pub fn plan(&self, answers: &Env) -> Result<Plan> {
        let env = computed::derive(self.config, answers)?;
        let scope = Scope::new(&env);
        let tree = self.load_tree()?;

        info!(
            files = tree.len(),
            rules = self.features.len(),
            root = %self.template_root().display(),
            "planning"
        );
        if self.features.is_empty() {
            debug!("no feature rules; every file is included by default");
        }

        let mut files = Vec::new();
        let mut omitted = Vec::new();

        for file in tree {
            let reason = match self.features.decide(&file.rel_path, &scope)? {
                Decision::Included(reason) => reason,
                Decision::Excluded { rules } => {
                    debug!(path = %file.rel_path, ?rules, "excluded");
                    omitted.push(OmittedFile {
                        template_path: file.rel_path,
                        omission: Omission::Excluded { rules },
                    });
                    continue;
                }
            };
            debug!(path = %file.rel_path, ?reason, "included");

            let Some(output_path) = render_path(&file.rel_path, &scope)? else {
                debug!(path = %file.rel_path, "rendered path is empty; omitting");
                omitted.push(OmittedFile {
                    template_path: file.rel_path,
                    omission: Omission::EmptyPath,
                });
                continue;
            };

            let (content, rendered) = if self.is_verbatim(&file.rel_path) {
                (file.content, false)
            } else {
                match String::from_utf8(file.content) {
                    Ok(text) => {
                        let template = Template::parse(&text)
                            .map_err(|e| ScaffoldError::template(&file.rel_path, e))?;
                        let body = template
                            .render(&scope)
                            .map_err(|e| ScaffoldError::render(&file.rel_path, e))?;
                        (body.into_bytes(), true)
                    }
                    Err(e) => (e.into_bytes(), false),
                }
            };

            files.push(PlannedFile {
                template_path: file.rel_path,
                output_path,
                content,
                rendered,
                reason,
            });
        }

        info!(included = files.len(), omitted = omitted.len(), "plan ready");

        Ok(Plan {
            scope: env,
            files,
            omitted,
        })
    }

    /// Parse every template path and body without rendering.
    ///
    /// Returns the number of files checked.
    pub fn check_templates(&self) -> Result<usize> {
        let tree = self.load_tree()?;

        for file in &tree {
            Template::parse(&file.rel_path)
                .map_err(|e| ScaffoldError::template(&file.rel_path, e))?;

            if self.is_verbatim(&file.rel_path) {
                continue;
            }
            if let Ok(text) = std::str::from_utf8(&file.content) {
                Template::parse(text).map_err(|e| ScaffoldError::template(&file.rel_path, e))?;
            }
        }

        Ok(tree.len())
    }
}

/// Render a template path into an output path.
///
/// Empty segments are dropped, so `{{ if go }}cmd{{ end }}/main.go` becomes
/// `main.go` when `go` is false. Returns `None` when nothing is left.
pub(super) fn render_path(template_path: &str, scope: &Scope<'_>) -> Result<Option<String>> {
    let rendered = if template_path.contains("{{") {
        Template::parse(template_path)
            .map_err(|e| ScaffoldError::template(template_path, e))?
            .render(scope)
            .map_err(|e| ScaffoldError::render(template_path, e))?
    } else {
        template_path.to_string()
    };

    let normalized = rendered.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(ScaffoldError::Template {
                    path: template_path.to_string(),
                    line: 1,
                    reason: format!(
                        "rendered path '{}' escapes the output directory",
                        rendered
                    ),
                });
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        Ok(None)
    } else {
        Ok(Some(segments.join("/")))
    }
}
