use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use asset_scanner::{
    CancelToken, ScanProgress, find_missing_files, parse_alias_files, parse_gdt_files, scan_assets,
    write_consolidated_csv,
};
use asset_scanner::utils::{find_files_by_extension, format_bytes};

/// Scan asset definition files and report their file dependencies
#[derive(Parser, Debug)]
#[command(name = "asset_scanner", version)]
struct Args {
    /// Definition files to scan; directories expand to the .gdt files inside
    #[arg(required = true)]
    definitions: Vec<PathBuf>,

    /// Content tree root to verify references against
    #[arg(short, long)]
    root: PathBuf,

    /// Write the full report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a consolidated alias table for the referenced aliases
    #[arg(long)]
    consolidated_csv: Option<PathBuf>,

    /// Propose replacements for missing paths
    #[arg(long)]
    find_missing: bool,
}

struct ProgressReporter {
    bar: ProgressBar,
}

impl ScanProgress for ProgressReporter {
    fn on_progress(&self, current: usize, total: usize, message: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(message.to_string());
    }

    fn on_search_progress(&self, directory: &str, files_scanned: usize) {
        self.bar
            .set_message(format!("Indexing {directory}: {files_scanned} files"));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let definitions: Vec<PathBuf> = args
        .definitions
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                find_files_by_extension(path, "gdt")
            } else {
                vec![path.clone()]
            }
        })
        .collect();

    let parse_result = parse_gdt_files(&definitions);
    info!(
        "Parsed {} assets from {} definition files",
        parse_result.total_assets,
        definitions.len()
    );
    for error in &parse_result.errors {
        eprintln!("parse error: {error}");
    }

    let alias_result = parse_alias_files(&args.root);

    let bar = ProgressBar::new(parse_result.total_assets as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    let reporter = ProgressReporter { bar: bar.clone() };

    let report = scan_assets(
        &parse_result,
        &args.root,
        Some(&alias_result),
        &definitions,
        Some(&reporter),
    );
    bar.finish_with_message(format!("Scanned {} references", report.total_references()));

    println!("Found:   {}", report.found_count);
    println!("Missing: {}", report.missing_count);
    println!("Size:    {}", format_bytes(report.total_bytes));
    for error in &report.errors {
        eprintln!("scan error: {error}");
    }

    if !report.missing_paths.is_empty() {
        println!("\nMissing paths:");
        for path in &report.missing_paths {
            println!("  {path}");
        }
    }

    if args.find_missing && !report.missing_paths.is_empty() {
        let cancel = CancelToken::new();
        let results = find_missing_files(&report.missing_paths, &args.root, Some(&reporter), &cancel);
        for result in &results {
            if result.matches.is_empty() {
                continue;
            }
            println!("\n{}", result.original_path);
            for candidate in result.matches.iter().take(3) {
                println!(
                    "  {:>3}  {}  ({})",
                    candidate.score, candidate.found_path, candidate.reason
                );
            }
        }
    }

    if let Some(csv_path) = &args.consolidated_csv {
        write_consolidated_csv(
            report.referenced_sound_aliases.iter().map(String::as_str),
            &alias_result.table,
            csv_path,
        )?;
        println!("Consolidated alias table written to {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        std::fs::write(json_path, serde_json::to_string_pretty(&report)?)?;
        info!("Report written to {}", json_path.display());
    }

    Ok(())
}
