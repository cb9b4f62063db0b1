use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::gdt::AttachmentDefinition;
use super::paths::join_relative;

/// One declared file reference, resolved against the content tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAsset {
    /// Path exactly as the source declared it, pre-normalization
    pub declared_path: String,
    /// Cleaned path relative to the content root, `/`-separated
    pub relative_path: String,
    /// Absolute candidate location on disk
    pub full_path: PathBuf,
    /// Whether the file was found
    pub exists: bool,
    /// File size in bytes, 0 when missing
    pub size_bytes: u64,
    /// Asset that declared the reference
    pub asset_name: String,
    /// Declared type tag of the owning asset
    pub asset_kind: String,
}

/// Aggregate dependency report for one scan.
///
/// Grows monotonically while the scan runs; each scan operates on its own
/// report instance. `missing_paths` keeps the original declared spelling so
/// the user-visible report matches the source format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    /// When the scan started
    pub scanned_at: DateTime<Utc>,
    /// Verified file references from definition files and attachments
    pub assets: Vec<ResolvedAsset>,
    /// Verified sound files reached through alias resolution
    pub sound_files: Vec<ResolvedAsset>,
    /// Alias names referenced by the scanned assets, insertion order
    pub referenced_sound_aliases: Vec<String>,
    /// Attachment definitions resolved from sibling files
    pub resolved_attachments: Vec<AttachmentDefinition>,
    /// Declared paths that failed verification, original spelling preserved
    pub missing_paths: Vec<String>,
    /// Number of references found on disk
    pub found_count: usize,
    /// Number of references not found
    pub missing_count: usize,
    /// Total size of all found files
    pub total_bytes: u64,
    /// Non-fatal problems encountered during the scan
    pub errors: Vec<String>,
}

impl Default for DependencyReport {
    fn default() -> Self {
        Self {
            scanned_at: Utc::now(),
            assets: Vec::new(),
            sound_files: Vec::new(),
            referenced_sound_aliases: Vec::new(),
            resolved_attachments: Vec::new(),
            missing_paths: Vec::new(),
            found_count: 0,
            missing_count: 0,
            total_bytes: 0,
            errors: Vec::new(),
        }
    }
}

impl DependencyReport {
    /// Total number of verified references, sound files included
    pub fn total_references(&self) -> usize {
        self.assets.len() + self.sound_files.len()
    }

    pub(crate) fn add_sound_alias(&mut self, name: &str) {
        let exists = self
            .referenced_sound_aliases
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(name));
        if !exists {
            self.referenced_sound_aliases.push(name.to_string());
        }
    }

    pub(crate) fn record_asset(&mut self, asset: ResolvedAsset) {
        self.account(&asset);
        self.assets.push(asset);
    }

    pub(crate) fn record_sound_file(&mut self, asset: ResolvedAsset) {
        self.account(&asset);
        self.sound_files.push(asset);
    }

    fn account(&mut self, asset: &ResolvedAsset) {
        if asset.exists {
            self.found_count += 1;
            self.total_bytes += asset.size_bytes;
        } else {
            self.missing_count += 1;
            self.missing_paths.push(asset.declared_path.clone());
            warn!("Missing asset file: {}", asset.declared_path);
        }
    }

    /// Replace one failed reference's path with a located alternative and
    /// re-verify it.
    ///
    /// `original` is the declared path as reported in `missing_paths`.
    /// Idempotent: re-applying the same replacement leaves counts and totals
    /// unchanged. Returns false when no reference matches `original`.
    pub fn apply_replacement(&mut self, original: &str, new_relative: &str, root: &Path) -> bool {
        let Some(asset) = self
            .assets
            .iter_mut()
            .chain(self.sound_files.iter_mut())
            .find(|a| a.declared_path == original)
        else {
            return false;
        };

        let full = join_relative(root, new_relative);
        let (exists, size_bytes) = match std::fs::metadata(&full) {
            Ok(metadata) if metadata.is_file() => (true, metadata.len()),
            _ => (false, 0),
        };

        if asset.exists {
            self.found_count -= 1;
            self.total_bytes -= asset.size_bytes;
        } else {
            self.missing_count -= 1;
            if let Some(pos) = self.missing_paths.iter().position(|p| p == original) {
                self.missing_paths.remove(pos);
            }
        }

        asset.relative_path = new_relative.to_string();
        asset.full_path = full;
        asset.exists = exists;
        asset.size_bytes = size_bytes;

        if exists {
            self.found_count += 1;
            self.total_bytes += size_bytes;
        } else {
            self.missing_count += 1;
            self.missing_paths.push(original.to_string());
        }

        true
    }
}
