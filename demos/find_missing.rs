use std::path::PathBuf;

use anyhow::Result;
use asset_scanner::{
    CancelToken, ScanProgress, find_missing_files, parse_alias_files, parse_gdt_files, scan_assets,
};

struct StdoutProgress;

impl ScanProgress for StdoutProgress {
    fn on_progress(&self, current: usize, total: usize, message: &str) {
        println!("[{current}/{total}] {message}");
    }

    fn on_search_progress(&self, directory: &str, files_scanned: usize) {
        println!("indexing {directory}: {files_scanned} files");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let root = PathBuf::from("path/to/your/content_root");
    let definitions = vec![PathBuf::from("path/to/your/weapons.gdt")];

    let parse_result = parse_gdt_files(&definitions);
    let alias_result = parse_alias_files(&root);
    let mut report = scan_assets(&parse_result, &root, Some(&alias_result), &definitions, None);

    if report.missing_paths.is_empty() {
        println!("Nothing missing, nothing to do");
        return Ok(());
    }

    // The token can be cancelled from another thread while the index builds
    let cancel = CancelToken::new();
    let results = find_missing_files(&report.missing_paths, &root, Some(&StdoutProgress), &cancel);

    for result in &results {
        println!("\n{}", result.original_path);
        for candidate in &result.matches {
            println!("  {:>3}  {}  ({})", candidate.score, candidate.found_path, candidate.reason);
        }

        // Apply exact matches automatically; fuzzy ones need a human
        if result.has_exact_match() {
            let best = &result.matches[0];
            if report.apply_replacement(&result.original_path, &best.found_path, &root) {
                println!("  applied: {}", best.found_path);
            }
        }
    }

    println!(
        "\nAfter fixes: {} found, {} missing",
        report.found_count, report.missing_count
    );

    Ok(())
}
