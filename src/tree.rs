//! Template tree loading.

use crate::error::{Result, ScaffoldError};
use crate::select::normalize_path;
use std::path::Path;
use walkdir::WalkDir;

/// One file from the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the template root, forward slashes.
    pub rel_path: String,
    pub content: Vec<u8>,
}

/// Load every file under `root`, sorted by relative path.
///
/// Directories are implied by the files they contain; empty directories are
/// not reproduced. Symlinks are followed.
pub fn load_tree(root: &Path) -> Result<Vec<TemplateFile>> {
    if !root.is_dir() {
        return Err(ScaffoldError::UserError(format!(
            "template directory '{}' does not exist",
            root.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to walk template directory '{}': {}",
                root.display(),
                e
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(root).map_err(|_| {
            ScaffoldError::UserError(format!(
                "template file '{}' is outside '{}'",
                entry.path().display(),
                root.display()
            ))
        })?;
        let rel_path = normalize_path(&rel.to_string_lossy());

        let content = std::fs::read(entry.path()).map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to read template file '{}': {}",
                entry.path().display(),
                e
            ))
        })?;

        files.push(TemplateFile { rel_path, content });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_tree_sorted_with_forward_slashes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("src/nested/deep.rs"), "deep").unwrap();
        fs::write(root.join("src/lib.rs"), "lib").unwrap();

        let files = load_tree(root).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();

        assert_eq!(paths, vec!["a.txt", "b.txt", "src/lib.rs", "src/nested/deep.rs"]);
        assert_eq!(files[0].content, b"a");
    }

    #[test]
    fn test_binary_content_preserved() {
        let temp = TempDir::new().unwrap();
        let bytes = vec![0u8, 159, 146, 150, 255];
        fs::write(temp.path().join("logo.png"), &bytes).unwrap();

        let files = load_tree(temp.path()).unwrap();
        assert_eq!(files[0].content, bytes);
    }

    #[test]
    fn test_missing_root_is_user_error() {
        let temp = TempDir::new().unwrap();
        let err = load_tree(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ScaffoldError::UserError(_)));
    }
}
