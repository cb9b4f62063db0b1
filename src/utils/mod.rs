use std::path::{Path, PathBuf};
use anyhow::Result;
use walkdir::WalkDir;

/// Find all files with a specific extension (case-insensitive), recursively
pub fn find_files_by_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase() == extension)
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// List files with a specific extension in a single directory, no recursion.
/// Results are sorted by file name so batch output is stable.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase() == extension)
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Check if a file exists
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Create a directory if it doesn't exist
pub fn create_dir_if_not_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    Ok(())
}

/// Format a byte count as a human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut len = bytes as f64;
    let mut order = 0;
    while len >= 1024.0 && order < UNITS.len() - 1 {
        order += 1;
        len /= 1024.0;
    }
    if order == 0 {
        format!("{} {}", bytes, UNITS[order])
    } else {
        format!("{:.2} {}", len, UNITS[order])
    }
}
