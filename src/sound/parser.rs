use std::fs;
use std::path::Path;

use anyhow::Result;
use log::{error, info};

use crate::utils::list_files_with_extension;
use super::types::SoundAliasParseResult;

/// File extensions that mark a field as a sound file path
const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".flac"];

/// Field prefixes that mark a value as a reference to another alias
const ALIAS_PREFIXES: &[&str] = &[
    "wpn_", "evt_", "amb_", "mus_", "vox_", "fly_", "foley_", "ui_", "zmb_", "veh_", "chr_",
];

/// Parse every alias table file under `<root>/share/raw/sound/aliases`.
///
/// A missing directory or an unreadable table is recorded in the result's
/// error list; the batch continues past each bad file.
pub fn parse_alias_files(root: &Path) -> SoundAliasParseResult {
    let mut result = SoundAliasParseResult::default();

    let alias_dir = root.join("share").join("raw").join("sound").join("aliases");
    if !alias_dir.is_dir() {
        let msg = format!("sound alias directory not found: {}", alias_dir.display());
        error!("{msg}");
        result.errors.push(msg);
        return result;
    }

    info!("Parsing sound alias tables from {}", alias_dir.display());

    for table_file in list_files_with_extension(&alias_dir, "csv") {
        if let Err(e) = parse_alias_file(&table_file, &mut result) {
            let msg = format!("error parsing alias table {}: {e}", table_file.display());
            error!("{msg}");
            result.errors.push(msg);
        }
    }

    result.total_aliases = result.table.len();
    result.total_sound_files = result.table.iter().map(|a| a.file_paths.len()).sum();

    info!(
        "Alias parsing complete: {} aliases, {} sound files",
        result.total_aliases, result.total_sound_files
    );

    result
}

/// Parse one comma-separated alias table file into the shared result.
///
/// Field 0 is the alias name; later fields are sniffed by content — audio
/// extension means file path, a known domain prefix means a chained alias,
/// anything else is tuning data we ignore.
fn parse_alias_file(path: &Path, result: &mut SoundAliasParseResult) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            continue;
        }

        let alias_name = fields[0].trim();
        if alias_name.is_empty() {
            continue;
        }

        let alias = result.table.entry_or_insert(alias_name, &source_name);

        for field in &fields[1..] {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }

            if is_sound_file(field) {
                let normalized = field.replace('\\', "/");
                if !alias.file_paths.contains(&normalized) {
                    alias.file_paths.push(normalized);
                }
            } else if is_alias_reference(field) {
                if !alias.secondary_aliases.iter().any(|existing| existing == field) {
                    alias.secondary_aliases.push(field.to_string());
                }
            }
        }
    }

    Ok(())
}

fn is_sound_file(field: &str) -> bool {
    let lower = field.to_lowercase();
    AUDIO_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

fn is_alias_reference(field: &str) -> bool {
    let lower = field.to_lowercase();
    ALIAS_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}
