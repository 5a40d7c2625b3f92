use crate::expr::{Env, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;
use walkdir::WalkDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Two-language template used across tests.
///
/// `go.mod` and every `.go` file are only generated when "Go" is selected.
pub(crate) const LANGS_CONFIG: &str = r#"
questions:
  - name: ProjectName
    prompt:
      message: Project name
  - name: langs
    prompt:
      message: Languages
      kind: multi
      options: [Go, Python]
computed:
  - name: go
    expr: '"Go" in langs'
features:
  - when: go
    globs: ["**/go.mod", "**/*.go"]
presets:
  python:
    ProjectName: pysvc
    langs: [Python]
  polyglot:
    ProjectName: poly
    langs: [Go, Python]
"#;

pub(crate) const LANGS_FILES: &[(&str, &str)] = &[
    (
        "README.md",
        "# {{ .ProjectName }}\n{{ range langs }}- {{ . }}\n{{ end }}",
    ),
    ("go.mod", "module example.com/{{ .ProjectName }}\n"),
    (
        "cmd/{{ .ProjectName }}/main.go",
        "package main // {{ .ProjectName }}\n",
    ),
    ("app/main.py", "print(\"{{ .ProjectName }}\")\n"),
];

/// Create a template source directory with `scaffold.yaml` and files under `template/`.
pub(crate) fn create_template_source(config: &str, files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("scaffold.yaml"), config).unwrap();

    let template = temp_dir.path().join("template");
    std::fs::create_dir_all(&template).unwrap();
    for (rel, content) in files {
        write_file(&template, rel, content);
    }

    temp_dir
}

pub(crate) fn langs_source() -> TempDir {
    create_template_source(LANGS_CONFIG, LANGS_FILES)
}

pub(crate) fn write_file(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Every file under `root`, keyed by forward-slash relative path.
pub(crate) fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry.path().strip_prefix(root).unwrap();
            (
                rel.to_string_lossy().replace('\\', "/"),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

/// Answers for the langs template.
pub(crate) fn langs_answers(project: &str, langs: &[&str]) -> Env {
    let mut env = Env::new();
    env.insert("ProjectName".to_string(), Value::Str(project.to_string()));
    env.insert(
        "langs".to_string(),
        Value::List(langs.iter().map(|s| s.to_string()).collect()),
    );
    env
}
