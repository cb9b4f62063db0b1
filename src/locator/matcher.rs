use std::path::Path;

use log::{error, info};

use crate::types::{CancelToken, ScanProgress};
use super::index::{FileIndex, build_file_index};
use super::types::{FileMatch, MissingFileSearchResult};

/// Partial matches are capped to bound result size
const MAX_PARTIAL_NAMES: usize = 5;
const MAX_PATHS_PER_PARTIAL: usize = 2;

/// Propose replacement candidates for every missing path.
///
/// Builds the filename index once, then searches each path against it.
/// Cancellation yields whatever results were completed so far.
pub fn find_missing_files(
    missing_paths: &[String],
    root: &Path,
    progress: Option<&dyn ScanProgress>,
    cancel: &CancelToken,
) -> Vec<MissingFileSearchResult> {
    let mut results = Vec::new();

    if missing_paths.is_empty() {
        return results;
    }
    if !root.is_dir() {
        error!("Invalid content root: {}", root.display());
        return results;
    }

    info!("Searching for {} missing files", missing_paths.len());

    let index = build_file_index(root, progress, cancel);
    if cancel.is_cancelled() {
        return results;
    }

    for (i, missing) in missing_paths.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        if let Some(progress) = progress {
            progress.on_progress(
                i + 1,
                missing_paths.len(),
                &format!("Searching for {}", file_name_of(missing)),
            );
        }
        results.push(find_matches(missing, &index, root));
    }

    let matched = results.iter().filter(|r| !r.matches.is_empty()).count();
    info!(
        "Search complete: matches for {matched}/{} files",
        missing_paths.len()
    );

    results
}

/// Rank replacement candidates for one missing path.
///
/// Three tiers are applied in order and all results kept: exact filename
/// (score 100), same stem with a different extension (80), and filenames
/// containing the stem as a substring (60, capped). The final list is
/// sorted by descending score, tie-broken by ascending path length.
pub fn find_matches(missing_path: &str, index: &FileIndex, root: &Path) -> MissingFileSearchResult {
    let mut result = MissingFileSearchResult {
        original_path: missing_path.to_string(),
        matches: Vec::new(),
    };

    let file_name = file_name_of(missing_path).to_lowercase();
    let stem = stem_of(&file_name).to_string();

    // (a) exact filename match
    if let Some(paths) = index.get(&file_name) {
        for full_path in paths {
            result.matches.push(make_match(
                missing_path,
                full_path,
                root,
                100,
                "Exact filename match",
            ));
        }
    }

    // (b) same stem, different extension
    let mut similar: Vec<&str> = index
        .file_names()
        .filter(|name| *name != file_name && stem_of(name) == stem)
        .collect();
    similar.sort_unstable();

    for name in similar {
        if let Some(paths) = index.get(name) {
            for full_path in paths {
                result.matches.push(make_match(
                    missing_path,
                    full_path,
                    root,
                    80,
                    "Same name, different extension",
                ));
            }
        }
    }

    // (c) stem substring, excluding the tiers above
    let mut partial: Vec<&str> = index
        .file_names()
        .filter(|name| {
            *name != file_name && stem_of(name) != stem && !stem.is_empty() && name.contains(&stem)
        })
        .collect();
    partial.sort_unstable();
    partial.truncate(MAX_PARTIAL_NAMES);

    for name in partial {
        if let Some(paths) = index.get(name) {
            for full_path in paths.iter().take(MAX_PATHS_PER_PARTIAL) {
                result.matches.push(make_match(
                    missing_path,
                    full_path,
                    root,
                    60,
                    "Partial filename match",
                ));
            }
        }
    }

    result.matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.found_path.len().cmp(&b.found_path.len()))
    });

    result
}

fn make_match(
    original: &str,
    full_path: &Path,
    root: &Path,
    score: u32,
    reason: &str,
) -> FileMatch {
    let found_path = full_path
        .strip_prefix(root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| full_path.to_string_lossy().into_owned());
    let size_bytes = std::fs::metadata(full_path).map(|m| m.len()).unwrap_or(0);

    FileMatch {
        original_path: original.to_string(),
        found_path,
        full_path: full_path.to_path_buf(),
        score,
        size_bytes,
        reason: reason.to_string(),
    }
}

/// Last path component of a declared path, whichever separator it uses
fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Filename without its last extension
fn stem_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}
