//! Go file discovery
//!
//! Hidden entries and `vendor` directories are never entered, and `_test.go` files are never
//! returned.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("_test.go"))
}

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go") && !is_test_file(path)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "vendor")
}

/// `.go` files under `root`, sorted
pub fn go_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(target: "goreorder::cli", "skipping entry: {error}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_go_file(path))
        .collect();
    files.sort();
    files
}
