use std::path::{Path, PathBuf};

use crate::utils::file_exists;

/// A candidate filesystem location for a declared path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path relative to the content root, `/`-separated
    pub relative: String,
    /// Absolute candidate location
    pub full: PathBuf,
    /// Whether the candidate exists as a file
    pub exists: bool,
}

/// Clean a declared path: trim, collapse doubled separators, strip leading
/// parent-directory segments and a single current-directory segment, and
/// canonicalize separators to `/`.
///
/// Engine placeholders — empty after cleanup, `$`-prefixed, `ximage_`
/// texture handles, extension-less bare names — return `None`: they are
/// neither verified nor reported missing.
pub fn clean_asset_path(raw: &str) -> Option<String> {
    let mut path: String = raw.trim().replace('\\', "/");
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    while let Some(rest) = path.strip_prefix("../") {
        path = rest.to_string();
    }
    if let Some(rest) = path.strip_prefix("./") {
        path = rest.to_string();
    }

    if path.is_empty() || path.starts_with('$') {
        return None;
    }
    let lower = path.to_lowercase();
    if lower.starts_with("ximage_") {
        return None;
    }
    if !path.contains('/') && Path::new(&path).extension().is_none() {
        return None;
    }

    Some(path)
}

/// Join a `/`-separated relative path onto the content root using native
/// path components.
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut full = root.to_path_buf();
    for component in relative.split('/').filter(|c| !c.is_empty()) {
        full.push(component);
    }
    full
}

fn verify(root: &Path, relative: String) -> ResolvedPath {
    let full = join_relative(root, &relative);
    let exists = file_exists(&full);
    ResolvedPath { relative, full, exists }
}

/// Map a declared path to its candidate location, applying the format's
/// directory conventions in order. Returns `None` for engine placeholders.
pub fn resolve_asset_path(raw: &str, root: &Path) -> Option<ResolvedPath> {
    let clean = clean_asset_path(raw)?;
    let lower = clean.to_lowercase();

    // Effects declare `fx/<name>` but live under `share/raw/fx`
    if lower.starts_with("fx/") {
        let relative = format!("share/raw/fx/{}", &clean[3..]);
        return Some(verify(root, relative));
    }

    // Animations try `xanim_export` first, then fall back to `model_export`;
    // the first attempt is kept for reporting when neither exists
    if lower.contains(".xanim")
        && !lower.starts_with("xanim_export")
        && !lower.starts_with("model_export")
    {
        let primary = verify(root, format!("xanim_export/{clean}"));
        if primary.exists {
            return Some(primary);
        }
        let fallback = verify(root, format!("model_export/{clean}"));
        if fallback.exists {
            return Some(fallback);
        }
        return Some(primary);
    }

    // Models live under `model_export` unless already rooted there
    if lower.contains(".xmodel") && !lower.starts_with("model_export") {
        return Some(verify(root, format!("model_export/{clean}")));
    }

    Some(verify(root, clean))
}

/// Attachment file paths are always models in this format; force the model
/// directory mapping regardless of extension.
pub fn resolve_model_path(raw: &str, root: &Path) -> Option<ResolvedPath> {
    let clean = clean_asset_path(raw)?;
    let relative = if clean.to_lowercase().starts_with("model_export") {
        clean
    } else {
        format!("model_export/{clean}")
    };
    Some(verify(root, relative))
}

/// Alias table paths are relative to the sound bank directory, not the
/// content root.
pub fn resolve_sound_path(path: &str, root: &Path) -> ResolvedPath {
    let normalized = path.trim().replace('\\', "/");
    verify(root, format!("sound_assets/{normalized}"))
}
