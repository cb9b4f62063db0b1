use std::path::PathBuf;

use anyhow::Result;
use asset_scanner::{parse_alias_files, parse_gdt_files, scan_assets};
use asset_scanner::utils::format_bytes;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Point these at your own content tree and definition files
    let root = PathBuf::from("path/to/your/content_root");
    let definitions = vec![PathBuf::from("path/to/your/weapons.gdt")];

    println!("\n=== Parsing definition files ===");
    let parse_result = parse_gdt_files(&definitions);
    println!("Assets: {}", parse_result.total_assets);
    println!("File references: {}", parse_result.total_files);
    for error in &parse_result.errors {
        println!("error: {error}");
    }

    // Print some example assets
    println!("\nExample assets:");
    for asset in parse_result.assets.iter().take(5) {
        println!(
            "  - {} ({}) with {} file paths, {} aliases",
            asset.name,
            asset.kind,
            asset.file_paths.len(),
            asset.sound_aliases.len()
        );
    }

    println!("\n=== Scanning against the content tree ===");
    let alias_result = parse_alias_files(&root);
    let report = scan_assets(&parse_result, &root, Some(&alias_result), &definitions, None);

    println!("Found:   {}", report.found_count);
    println!("Missing: {}", report.missing_count);
    println!("Size:    {}", format_bytes(report.total_bytes));

    for path in report.missing_paths.iter().take(10) {
        println!("  missing: {path}");
    }

    Ok(())
}
