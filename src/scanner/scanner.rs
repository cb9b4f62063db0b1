use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::gdt::{self, GdtParseResult};
use crate::sound::{self, SoundAliasParseResult};
use crate::types::ScanProgress;
use crate::utils::format_bytes;

use super::paths;
use super::types::{DependencyReport, ResolvedAsset};

/// Verify every reference collected from the definition files against the
/// content tree and aggregate the results into a dependency report.
///
/// `definition_files` locates the directory searched for shared sound
/// groups and attachment blocks. An invalid content root short-circuits the
/// scan: the returned report is empty apart from a single top-level error.
pub fn scan_assets(
    parse_result: &GdtParseResult,
    root: &Path,
    alias_result: Option<&SoundAliasParseResult>,
    definition_files: &[PathBuf],
    progress: Option<&dyn ScanProgress>,
) -> DependencyReport {
    let mut report = DependencyReport::default();

    if root.as_os_str().is_empty() || !root.is_dir() {
        let msg = format!("invalid content root: {}", root.display());
        error!("{msg}");
        report.errors.push(msg);
        return report;
    }

    info!("Scanning assets against {}", root.display());

    let definition_dir = definition_files
        .first()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf);

    let total = parse_result.assets.len();
    for (index, asset) in parse_result.assets.iter().enumerate() {
        if let Some(progress) = progress {
            progress.on_progress(index + 1, total, &format!("Scanning {}", asset.name));
        }

        for declared in &asset.file_paths {
            let Some(resolved) = paths::resolve_asset_path(declared, root) else {
                debug!("Skipping engine placeholder: {declared}");
                continue;
            };
            report.record_asset(make_asset(declared, resolved, &asset.name, &asset.kind));
        }

        for alias in &asset.sound_aliases {
            report.add_sound_alias(alias);
        }

        let Some(dir) = definition_dir.as_deref() else {
            continue;
        };

        for group in &asset.shared_sound_groups {
            debug!("Resolving shared sound group: {group}");
            for alias in gdt::resolve_shared_sounds(group, dir) {
                report.add_sound_alias(&alias);
            }
        }

        for attachment_name in &asset.attachment_refs {
            debug!("Resolving attachment: {attachment_name}");
            let Some(definition) = gdt::resolve_attachment(attachment_name, dir) else {
                continue;
            };

            for declared in &definition.file_paths {
                let Some(resolved) = paths::resolve_model_path(declared, root) else {
                    continue;
                };
                let kind = format!("{} (attachment: {attachment_name})", asset.kind);
                report.record_asset(make_asset(declared, resolved, &asset.name, &kind));
            }

            report.resolved_attachments.push(definition);
        }
    }

    if let Some(aliases) = alias_result {
        resolve_sound_references(&mut report, aliases, root);
    }

    info!(
        "Scan complete: {} found, {} missing, total size {}",
        report.found_count,
        report.missing_count,
        format_bytes(report.total_bytes)
    );

    report
}

/// Resolve every referenced sound alias to concrete files and verify each
/// under the sound bank directory.
fn resolve_sound_references(
    report: &mut DependencyReport,
    aliases: &SoundAliasParseResult,
    root: &Path,
) {
    if report.referenced_sound_aliases.is_empty() {
        return;
    }

    info!(
        "Resolving {} sound aliases",
        report.referenced_sound_aliases.len()
    );

    let names: Vec<String> = report.referenced_sound_aliases.clone();
    for alias_name in &names {
        let sound_paths = sound::resolve_alias_files(alias_name, &aliases.table);
        if sound_paths.is_empty() {
            debug!("Alias '{alias_name}' resolved to no files");
        }
        for sound_path in sound_paths {
            let resolved = paths::resolve_sound_path(&sound_path, root);
            report.record_sound_file(make_asset(&sound_path, resolved, alias_name, "soundalias"));
        }
    }

    info!("Sound resolution complete: {} sound files", report.sound_files.len());
}

fn make_asset(
    declared: &str,
    resolved: paths::ResolvedPath,
    asset_name: &str,
    asset_kind: &str,
) -> ResolvedAsset {
    let size_bytes = if resolved.exists {
        read_size(&resolved.full)
    } else {
        0
    };

    ResolvedAsset {
        declared_path: declared.to_string(),
        relative_path: resolved.relative,
        full_path: resolved.full,
        exists: resolved.exists,
        size_bytes,
        asset_name: asset_name.to_string(),
        asset_kind: asset_kind.to_string(),
    }
}

/// Size lookup failures are counted as warnings, never fatal to the batch.
fn read_size(path: &Path) -> u64 {
    match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!("Failed to read metadata for {}: {e}", path.display());
            0
        }
    }
}
