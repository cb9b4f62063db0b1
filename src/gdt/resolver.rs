use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::parser::{HEADER_RE, PROPERTY_RE, is_file_property};
use super::types::AttachmentDefinition;

/// Sibling definition files worth searching for shared blocks. Shared
/// definitions live in files with a `common` name component or a leading
/// underscore; everything else is skipped to avoid scanning the whole set.
///
/// The sequence is lazy so the search can stop at the first file that
/// yields a match; candidate order is directory enumeration order.
fn candidate_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    fs::read_dir(dir).into_iter().flatten().filter_map(|entry| {
        let path = entry.ok()?.path();
        if !path.is_file() {
            return None;
        }
        let is_gdt = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gdt"))
            .unwrap_or(false);
        if !is_gdt {
            return None;
        }
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.contains("common") || name.starts_with('_') {
            Some(path)
        } else {
            None
        }
    })
}

/// Resolve an attachment reference to its full definition block.
///
/// The first candidate file containing a matching header wins; remaining
/// candidates are not searched. A miss is non-fatal: logged and `None`.
pub fn resolve_attachment(name: &str, dir: &Path) -> Option<AttachmentDefinition> {
    let found = candidate_files(dir).find_map(|file| extract_block(name, &file));
    match &found {
        Some(definition) => info!(
            "Resolved attachment '{}' from {}",
            name,
            definition.source_file.display()
        ),
        None => warn!("Could not resolve attachment model: {name}"),
    }
    found
}

/// Capture the named block from one definition file, verbatim.
fn extract_block(name: &str, file: &Path) -> Option<AttachmentDefinition> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {e}", file.display());
            return None;
        }
    };

    let mut in_block = false;
    let mut depth = 0i32;
    let mut kind = String::new();
    let mut block_lines: Vec<&str> = Vec::new();
    let mut file_paths: Vec<String> = Vec::new();

    for line in content.lines() {
        if !in_block {
            if let Some(caps) = HEADER_RE.captures(line) {
                if caps[1].eq_ignore_ascii_case(name) {
                    in_block = true;
                    kind = caps[2].to_string();
                    block_lines.push(line);
                }
            }
            continue;
        }

        block_lines.push(line);

        if line.contains('{') {
            depth += 1;
        }
        if line.contains('}') {
            depth -= 1;
            if depth == 0 {
                return Some(AttachmentDefinition {
                    name: name.to_string(),
                    kind: std::mem::take(&mut kind),
                    raw_block: block_lines.join("\n"),
                    file_paths,
                    source_file: file.to_path_buf(),
                });
            }
        }

        if depth > 0 {
            if let Some(caps) = PROPERTY_RE.captures(line) {
                let value = caps[2].trim();
                if is_file_property(&caps[1]) && !value.is_empty() {
                    if !file_paths.iter().any(|existing| existing == value) {
                        file_paths.push(value.to_string());
                    }
                }
            }
        }
    }

    None
}

/// Resolve a shared sound group name to the alias names its block lists.
///
/// Every non-empty property value inside the block is an alias name in this
/// format. The first candidate file that yields any aliases wins. A miss is
/// non-fatal: logged and empty.
pub fn resolve_shared_sounds(name: &str, dir: &Path) -> Vec<String> {
    for file in candidate_files(dir) {
        let aliases = extract_shared_aliases(name, &file);
        if !aliases.is_empty() {
            info!(
                "Resolved shared sound group '{}' with {} aliases from {}",
                name,
                aliases.len(),
                file.display()
            );
            return aliases;
        }
    }

    warn!("Could not find shared sound group definition: {name}");
    Vec::new()
}

fn extract_shared_aliases(name: &str, file: &Path) -> Vec<String> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {e}", file.display());
            return Vec::new();
        }
    };

    let mut in_block = false;
    let mut depth = 0i32;
    let mut aliases: Vec<String> = Vec::new();

    for line in content.lines() {
        if !in_block {
            if let Some(caps) = HEADER_RE.captures(line) {
                if caps[1].eq_ignore_ascii_case(name) {
                    in_block = true;
                }
            }
            continue;
        }

        if line.contains('{') {
            depth += 1;
        }
        if line.contains('}') {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }

        if depth > 0 {
            if let Some(caps) = PROPERTY_RE.captures(line) {
                let value = caps[2].trim();
                if !value.is_empty() && !aliases.iter().any(|existing| existing == value) {
                    aliases.push(value.to_string());
                }
            }
        }
    }

    aliases
}
