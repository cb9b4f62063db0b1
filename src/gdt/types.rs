use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// A single asset block parsed from a definition file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdtAsset {
    /// Asset name from the block header
    pub name: String,
    /// Declared type tag, e.g. `weapon.gdf`
    pub kind: String,
    /// Raw file paths from file-path properties, insertion order, distinct
    pub file_paths: Vec<String>,
    /// Sound alias names referenced by the asset
    pub sound_aliases: Vec<String>,
    /// Shared weapon sound group references
    pub shared_sound_groups: Vec<String>,
    /// Attachment model references (attachViewModelN / attachWorldModelN)
    pub attachment_refs: Vec<String>,
}

impl GdtAsset {
    pub(crate) fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            file_paths: Vec::new(),
            sound_aliases: Vec::new(),
            shared_sound_groups: Vec::new(),
            attachment_refs: Vec::new(),
        }
    }

    /// Whether the block collected at least one reference of any kind.
    /// Blocks with none are dropped instead of committed.
    pub fn has_references(&self) -> bool {
        !self.file_paths.is_empty()
            || !self.sound_aliases.is_empty()
            || !self.shared_sound_groups.is_empty()
            || !self.attachment_refs.is_empty()
    }
}

/// An attachment definition captured verbatim from a sibling definition file.
/// Identity is `(name, source_file)`; the struct is immutable once resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDefinition {
    /// Attachment asset name
    pub name: String,
    /// Declared type tag
    pub kind: String,
    /// Verbatim block text, header line through closing brace.
    /// Re-emitted byte-identically, never regenerated from structured data.
    pub raw_block: String,
    /// File paths declared inside the block
    pub file_paths: Vec<String>,
    /// Definition file the block was found in
    pub source_file: PathBuf,
}

/// Aggregate result of parsing one or more definition files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdtParseResult {
    /// Committed asset records in encounter order. Duplicate names across
    /// files are kept as separate records, not merged.
    pub assets: Vec<GdtAsset>,
    /// Number of committed assets
    pub total_assets: usize,
    /// Number of direct file references across all assets
    pub total_files: usize,
    /// Per-file input problems; parsing continues past each
    pub errors: Vec<String>,
}

impl GdtParseResult {
    pub(crate) fn finalize(&mut self) {
        self.total_assets = self.assets.len();
        self.total_files = self.assets.iter().map(|a| a.file_paths.len()).sum();
    }
}
