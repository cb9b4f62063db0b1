use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{GdtAsset, GdtParseResult};

/// Matches a block header line: `"name" ( "kind" )`
pub(crate) static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"([^"]+)"\s*\(\s*"([^"]+)"\s*\)"#).unwrap());

/// Matches a property line: `"key" "value"`
pub(crate) static PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"\s+"([^"]+)""#).unwrap());

static ATTACHMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(attachViewModel|attachWorldModel)\d+$").unwrap());

static ACTION_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)actionparam\d*$").unwrap());

/// Property keys whose value is a direct file path (compared lowercased)
const FILE_PROPERTIES: &[&str] = &[
    "baseimage",
    "filename",
    "model",
    "soundfile",
    "file",
    "texture",
    "image",
    "normalmap",
    "specularmap",
    "glossmap",
    "occlusionmap",
    "alphamap",
    "colormap",
    "detailmap",
    "revealmap",
    "camomaskmap",
    "camodetailmap",
];

/// Property keys whose value is a sound alias name (compared lowercased)
const SOUND_ALIAS_PROPERTIES: &[&str] = &[
    "firesound",
    "firesoundplayer",
    "firesoundplayerakimbo",
    "lastshotsound",
    "lastshotsoundplayer",
    "sound",
    "soundalias",
    "loopsound",
    "stopsound",
    "startsound",
    "endsound",
    "reloadsound",
    "reloadsoundplayer",
    "raisesound",
    "putawaysound",
    "adssound",
    "shellcasingsound",
    "meleesound",
    "meleesoundplayer",
    "chargesound",
    "chargesoundplayer",
    "rechambersound",
    "rechambersoundplayer",
    "altfiresound",
    "altfiresoundplayer",
    "explosionsound",
    "impactsound",
    "ambientsound",
    "musicalias",
    "voicealias",
    "pickupsound",
    "pickupsoundplayer",
    "dropsound",
    "nightvisionwearsound",
    "nightvisionwearsoundplayer",
    "nightvisionremovesound",
    "nightvisionremovesoundplayer",
    "projectilesound",
    "whizbysound",
    "shellshocksound",
    "deploysound",
    "finishdeploysound",
    "breakdownsound",
    "finishbreakdownsound",
    "detonatesound",
];

pub(crate) fn is_file_property(key: &str) -> bool {
    let key = key.to_lowercase();
    FILE_PROPERTIES.contains(&key.as_str())
}

fn is_sound_alias_property(key: &str) -> bool {
    let key = key.to_lowercase();
    SOUND_ALIAS_PROPERTIES.contains(&key.as_str())
}

/// Per-block parser state, fresh for every definition-file parse.
#[derive(Default)]
struct BlockState {
    /// Asset being filled while inside its block
    current: Option<GdtAsset>,
    /// Brace depth relative to the current block header
    brace_depth: i32,
    /// Base names of properties marked `"<base>action" "Sound"`, lowercased
    pending_sound_actions: HashSet<String>,
}

impl BlockState {
    /// Commit the current asset (if it collected anything) and open a new one
    fn open(&mut self, assets: &mut Vec<GdtAsset>, name: &str, kind: &str) {
        self.commit(assets);
        self.current = Some(GdtAsset::new(name, kind));
        self.brace_depth = 0;
        self.pending_sound_actions.clear();
    }

    fn commit(&mut self, assets: &mut Vec<GdtAsset>) {
        if let Some(asset) = self.current.take() {
            if asset.has_references() {
                assets.push(asset);
            }
        }
    }
}

fn push_distinct(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// Classify one property line against the ordered rule chain. Rule order is
/// part of the format contract: a value must never be double-classified.
fn classify_property(state: &mut BlockState, key: &str, value: &str) {
    let Some(asset) = state.current.as_mut() else {
        return;
    };

    // 1. "<base>action" "Sound" marks <base> as a pending sound action
    let key_lower = key.to_lowercase();
    if key_lower.len() > 6 && key_lower.ends_with("action") && value.eq_ignore_ascii_case("sound") {
        let base = key_lower[..key_lower.len() - 6].to_string();
        state.pending_sound_actions.insert(base);
        return;
    }

    // 2. "<base>actionparamN" carries the alias for a pending sound action
    if key_lower.contains("actionparam") {
        if let Some(caps) = ACTION_PARAM_RE.captures(key) {
            let base = caps[1].to_lowercase();
            if state.pending_sound_actions.contains(&base) {
                let alias = value.trim();
                if !alias.is_empty() {
                    push_distinct(&mut asset.sound_aliases, alias);
                }
                return;
            }
        }
    }

    // 3. Known file-path property
    if is_file_property(key) {
        let clean = value.trim().replace("\\\\", "\\");
        if !clean.is_empty() {
            push_distinct(&mut asset.file_paths, &clean);
        }
        return;
    }

    // 4. Known sound alias property
    if is_sound_alias_property(key) {
        let alias = value.trim();
        if !alias.is_empty() {
            push_distinct(&mut asset.sound_aliases, alias);
        }
        return;
    }

    // 5. Loose sound parameter keys also carry aliases
    if key_lower.contains("soundparam") || key_lower.contains("sound_") {
        let alias = value.trim();
        if !alias.is_empty() {
            push_distinct(&mut asset.sound_aliases, alias);
        }
        return;
    }

    // 6. Effect references by key suffix or value shape
    let value_lower = value.to_lowercase();
    if key_lower.ends_with("effect")
        || value_lower.starts_with("fx\\")
        || value_lower.starts_with("fx/")
        || value_lower.ends_with(".efx")
    {
        let clean = value.trim().replace("\\\\", "\\");
        if !clean.is_empty() {
            push_distinct(&mut asset.file_paths, &clean);
        }
        return;
    }

    // 7. Shared weapon sound group reference
    if key.eq_ignore_ascii_case("sharedweaponsounds") {
        let group = value.trim();
        if !group.is_empty() {
            push_distinct(&mut asset.shared_sound_groups, group);
        }
        return;
    }

    // 8. Attachment model reference
    if ATTACHMENT_RE.is_match(key) {
        let attachment = value.trim();
        if !attachment.is_empty() {
            push_distinct(&mut asset.attachment_refs, attachment);
        }
    }

    // Anything else is an engine property we don't care about
}

/// Parse a single definition file.
///
/// Input problems (missing file, unreadable content) are recorded in the
/// result's error list; a bad file never aborts a batch.
pub fn parse_gdt_file(path: &Path) -> GdtParseResult {
    let mut result = GdtParseResult::default();
    parse_into(path, &mut result);
    result.finalize();
    result
}

/// Parse a batch of definition files into one combined result.
/// Duplicate asset names across files are kept as separate records.
pub fn parse_gdt_files(paths: &[PathBuf]) -> GdtParseResult {
    let mut result = GdtParseResult::default();
    for path in paths {
        parse_into(path, &mut result);
    }
    result.finalize();
    info!(
        "Parsed {} definition files: {} assets, {} file references",
        paths.len(),
        result.assets.len(),
        result.assets.iter().map(|a| a.file_paths.len()).sum::<usize>()
    );
    result
}

fn parse_into(path: &Path, result: &mut GdtParseResult) {
    if !path.is_file() {
        let msg = format!("definition file not found: {}", path.display());
        error!("{msg}");
        result.errors.push(msg);
        return;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = format!("failed to read {}: {e}", path.display());
            error!("{msg}");
            result.errors.push(msg);
            return;
        }
    };

    info!("Parsing definition file: {}", path.display());

    let before = result.assets.len();
    let mut state = BlockState::default();
    for raw_line in content.lines() {
        let line = raw_line.trim();

        if let Some(caps) = HEADER_RE.captures(line) {
            state.open(&mut result.assets, &caps[1], &caps[2]);
            continue;
        }

        if line.contains('{') {
            state.brace_depth += 1;
        }
        if line.contains('}') {
            state.brace_depth -= 1;
        }

        if state.brace_depth > 0 {
            if let Some(caps) = PROPERTY_RE.captures(line) {
                classify_property(&mut state, &caps[1], &caps[2]);
            }
        }
    }
    state.commit(&mut result.assets);

    if result.assets.len() == before {
        warn!("No assets with references in {}", path.display());
    }
}
