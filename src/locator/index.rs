use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::scanner::join_relative;
use crate::types::{CancelToken, ScanProgress};

/// Content subdirectories worth indexing. The walk never covers the whole
/// tree; these are the directories the definition formats can reference.
const SEARCH_DIRS: &[&str] = &[
    "model_export",
    "xanim_export",
    "sound_assets",
    "share/raw",
    "texture_assets",
    "video",
];

/// Progress is reported at least this often during the index walk
const PROGRESS_INTERVAL: usize = 1000;

/// Filename-keyed index over the known content subdirectories.
/// Lookups ignore case.
#[derive(Debug, Default)]
pub struct FileIndex {
    by_name: HashMap<String, Vec<PathBuf>>,
    file_count: usize,
}

impl FileIndex {
    /// All indexed locations for a filename, ignoring case
    pub fn get(&self, file_name: &str) -> Option<&[PathBuf]> {
        self.by_name
            .get(&file_name.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Iterate all distinct indexed filenames (lowercased)
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of files indexed
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of distinct filenames
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    fn insert(&mut self, file_name: String, path: PathBuf) {
        self.by_name
            .entry(file_name.to_lowercase())
            .or_default()
            .push(path);
        self.file_count += 1;
    }
}

/// Build the filename index for a content tree.
///
/// Cancellation is checked between directories and on every file; on
/// cancellation the partial index built so far is returned rather than an
/// error. Progress is reported per directory and every 1000 files.
pub fn build_file_index(
    root: &Path,
    progress: Option<&dyn ScanProgress>,
    cancel: &CancelToken,
) -> FileIndex {
    let mut index = FileIndex::default();

    for subdir in SEARCH_DIRS {
        if cancel.is_cancelled() {
            debug!("Index build cancelled after {} files", index.file_count());
            break;
        }

        let dir = join_relative(root, subdir);
        if !dir.is_dir() {
            continue;
        }

        if let Some(progress) = progress {
            progress.on_search_progress(subdir, index.file_count());
        }

        for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
            if cancel.is_cancelled() {
                break;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            index.insert(file_name, entry.path().to_path_buf());

            if index.file_count() % PROGRESS_INTERVAL == 0 {
                if let Some(progress) = progress {
                    progress.on_search_progress(subdir, index.file_count());
                }
            }
        }
    }

    info!(
        "File index built: {} files under {} names",
        index.file_count(),
        index.name_count()
    );

    index
}
