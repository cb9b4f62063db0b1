use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::*;
use crate::scanner::join_relative;
use crate::types::{CancelToken, ScanProgress};

fn touch(root: &Path, relative: &str, content: &str) {
    let path = join_relative(root, relative);
    fs::create_dir_all(path.parent().unwrap()).expect("failed to create parent dirs");
    fs::write(&path, content).expect("failed to write content file");
}

#[test]
fn test_index_covers_only_known_directories() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/weapons/gun.xmodel", "model");
    touch(root.path(), "sound_assets/ui/click.wav", "wav");
    touch(root.path(), "zone_source/ignored.csv", "not indexed");

    let cancel = CancelToken::new();
    let index = build_file_index(root.path(), None, &cancel);

    assert_eq!(index.file_count(), 2, "Unknown subdirectories are skipped");
    assert!(index.get("gun.xmodel").is_some());
    assert!(index.get("GUN.XMODEL").is_some(), "Lookups ignore case");
    assert!(index.get("ignored.csv").is_none());
    Ok(())
}

#[test]
fn test_cancelled_index_build_returns_partial() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/gun.xmodel", "model");

    let cancel = CancelToken::new();
    cancel.cancel();
    let index = build_file_index(root.path(), None, &cancel);

    assert!(index.is_empty(), "Pre-cancelled build indexes nothing");
    Ok(())
}

#[test]
fn test_exact_filename_match_scores_100() -> Result<()> {
    let root = tempdir()?;
    // Typo'd directory in the declared path; the real file is indexed
    touch(root.path(), "model_export/weapons/gun.xmodel", "model");

    let cancel = CancelToken::new();
    let index = build_file_index(root.path(), None, &cancel);
    let result = find_matches("xmodel_export\\gun.xmodel", &index, root.path());

    assert!(result.has_exact_match());
    let best = &result.matches[0];
    assert_eq!(best.score, 100);
    assert_eq!(best.found_path, "model_export/weapons/gun.xmodel");
    assert_eq!(best.reason, "Exact filename match");
    Ok(())
}

#[test]
fn test_same_stem_different_extension_scores_80() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "texture_assets/icons/hud_ar.dds", "texture");

    let cancel = CancelToken::new();
    let index = build_file_index(root.path(), None, &cancel);
    let result = find_matches("icons\\hud_ar.png", &index, root.path());

    assert!(!result.has_exact_match());
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].score, 80);
    assert_eq!(result.matches[0].reason, "Same name, different extension");
    Ok(())
}

#[test]
fn test_partial_matches_score_60_and_are_capped() -> Result<()> {
    let root = tempdir()?;
    for i in 0..8 {
        touch(
            root.path(),
            &format!("model_export/variants/gun_barrel_{i:02}.xmodel"),
            "model",
        );
    }

    let cancel = CancelToken::new();
    let index = build_file_index(root.path(), None, &cancel);
    let result = find_matches("weapons\\gun_barrel.xmodel", &index, root.path());

    let partials: Vec<_> = result.matches.iter().filter(|m| m.score == 60).collect();
    assert!(!partials.is_empty());
    assert!(
        partials.len() <= 5 * 2,
        "Partial tier is capped at 5 filenames with 2 paths each"
    );
    assert!(partials.iter().all(|m| m.reason == "Partial filename match"));
    Ok(())
}

#[test]
fn test_matches_sorted_by_score_then_path_length() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/deep/nested/dir/scope.xmodel", "model");
    touch(root.path(), "model_export/scope.xmodel", "model");
    touch(root.path(), "texture_assets/scope.dds", "texture");

    let cancel = CancelToken::new();
    let index = build_file_index(root.path(), None, &cancel);
    let result = find_matches("attachments\\scope.xmodel", &index, root.path());

    let scores: Vec<u32> = result.matches.iter().map(|m| m.score).collect();
    let mut sorted = scores.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(scores, sorted, "Descending score order");

    // Among the two exact matches the shallower path wins the tie-break
    assert_eq!(result.matches[0].found_path, "model_export/scope.xmodel");
    assert_eq!(result.matches[1].found_path, "model_export/deep/nested/dir/scope.xmodel");
    Ok(())
}

#[derive(Default)]
struct RecordingProgress {
    search_calls: Mutex<Vec<(String, usize)>>,
    progress_calls: Mutex<Vec<(usize, usize)>>,
}

impl ScanProgress for RecordingProgress {
    fn on_progress(&self, current: usize, total: usize, _message: &str) {
        self.progress_calls.lock().unwrap().push((current, total));
    }

    fn on_search_progress(&self, directory: &str, files_scanned: usize) {
        self.search_calls
            .lock()
            .unwrap()
            .push((directory.to_string(), files_scanned));
    }
}

#[test]
fn test_find_missing_files_reports_progress() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/gun.xmodel", "model");

    let missing = vec!["weapons\\gun.xmodel".to_string(), "weapons\\other.xmodel".to_string()];
    let progress = RecordingProgress::default();
    let cancel = CancelToken::new();

    let results = find_missing_files(&missing, root.path(), Some(&progress), &cancel);

    assert_eq!(results.len(), 2);
    assert!(results[0].has_exact_match());
    assert!(results[1].matches.is_empty());

    let progress_calls = progress.progress_calls.lock().unwrap();
    assert_eq!(*progress_calls, vec![(1, 2), (2, 2)]);
    let search_calls = progress.search_calls.lock().unwrap();
    assert!(
        search_calls.iter().any(|(dir, _)| dir == "model_export"),
        "Index build reports per-directory progress"
    );
    Ok(())
}

#[test]
fn test_cancelled_search_returns_no_results() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/gun.xmodel", "model");

    let missing = vec!["weapons\\gun.xmodel".to_string()];
    let cancel = CancelToken::new();
    cancel.cancel();

    let results = find_missing_files(&missing, root.path(), None, &cancel);

    assert!(results.is_empty(), "Cancellation yields no error, just no results");
    Ok(())
}
