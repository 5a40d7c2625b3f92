//! Atomic file writes for generated output.
//!
//! Every generated file is written by the same three steps:
//! 1. Write content to a temporary file in the target's directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename it over the target
//!
//! An interrupted run therefore never leaves a half-written file behind; at
//! worst a `.{filename}.scaffold-tmp` file remains next to the target.
//! Source and destination are always on the same filesystem since the
//! temporary file lives in the target directory.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// Errors carry the path and the failing step in their message so they can
/// be reported to the user as-is.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        fs::create_dir_all(parent).map_err(|e| {
            context(e, format!("failed to create directory '{}'", parent.display()))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        context(e, format!("failed to replace '{}'", path.display()))
    })?;

    #[cfg(unix)]
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn temp_path_for(target: &Path) -> io::Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", target.display()),
        )
    })?;

    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(filename);
    temp_name.push(".scaffold-tmp");
    Ok(parent.join(temp_name))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path).map_err(|e| {
        context(e, format!("failed to create temporary file '{}'", path.display()))
    })?;

    let result = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = result {
        let _ = fs::remove_file(path);
        return Err(context(e, format!("failed to write '{}'", path.display())));
    }

    Ok(())
}

fn context(err: io::Error, what: String) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {}", what, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("README.md");

        atomic_write(&file_path, b"# demo\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# demo\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("go.mod");
        fs::write(&file_path, "module old").unwrap();

        atomic_write(&file_path, b"module new").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "module new");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("cmd").join("server").join("main.go");

        atomic_write(&file_path, b"package main").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "package main");
    }

    #[test]
    fn test_atomic_write_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("logo.png");
        let binary_content: Vec<u8> = (0..256).map(|i| i as u8).collect();

        atomic_write(&file_path, &binary_content).unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), binary_content);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"content").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("test.txt")]);
    }

    #[test]
    fn test_atomic_write_error_names_path() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is needed.
        fs::write(temp_dir.path().join("blocker"), "x").unwrap();
        let file_path = temp_dir.path().join("blocker").join("inner.txt");

        let err = atomic_write(&file_path, b"content").unwrap_err();

        assert!(err.to_string().contains("blocker"), "{}", err);
    }
}
