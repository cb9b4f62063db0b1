use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// A sound alias accumulated from one or more table rows.
/// Immutable once the table directory is fully read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundAlias {
    /// Alias name as first declared
    pub name: String,
    /// Sound file paths, `/`-separated, insertion order, distinct
    pub file_paths: Vec<String>,
    /// Names of other aliases this alias chains to, insertion order, distinct
    pub secondary_aliases: Vec<String>,
    /// Table file the alias was first declared in
    pub source_file: String,
}

/// Alias table keyed case-insensitively by alias name.
/// Rows with the same name across files accumulate into one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundAliasTable {
    aliases: HashMap<String, SoundAlias>,
}

impl SoundAliasTable {
    /// Look up an alias, ignoring case
    pub fn get(&self, name: &str) -> Option<&SoundAlias> {
        self.aliases.get(&name.to_lowercase())
    }

    /// Whether an alias is present, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(&name.to_lowercase())
    }

    /// Number of distinct aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate all aliases, arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &SoundAlias> {
        self.aliases.values()
    }

    pub(crate) fn entry_or_insert(&mut self, name: &str, source_file: &str) -> &mut SoundAlias {
        self.aliases
            .entry(name.to_lowercase())
            .or_insert_with(|| SoundAlias {
                name: name.to_string(),
                file_paths: Vec::new(),
                secondary_aliases: Vec::new(),
                source_file: source_file.to_string(),
            })
    }
}

/// Aggregate result of parsing an alias table directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundAliasParseResult {
    /// All aliases read from the table files
    pub table: SoundAliasTable,
    /// Number of distinct aliases
    pub total_aliases: usize,
    /// Number of direct sound file references across all aliases
    pub total_sound_files: usize,
    /// Per-file input problems; parsing continues past each
    pub errors: Vec<String>,
}
