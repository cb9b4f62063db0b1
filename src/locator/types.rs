use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// A candidate replacement for a missing path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMatch {
    /// The missing path the candidate was found for
    pub original_path: String,
    /// Candidate path relative to the content root, `/`-separated
    pub found_path: String,
    /// Absolute candidate location
    pub full_path: PathBuf,
    /// 100 exact filename, 80 same stem different extension, 60 partial
    pub score: u32,
    /// Candidate size in bytes
    pub size_bytes: u64,
    /// Human-readable reason for the match
    pub reason: String,
}

/// All candidates found for one missing path, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingFileSearchResult {
    /// The missing path that was searched for
    pub original_path: String,
    /// Candidates ordered by descending score, then ascending path length
    pub matches: Vec<FileMatch>,
}

impl MissingFileSearchResult {
    /// Whether any candidate matched the filename exactly
    pub fn has_exact_match(&self) -> bool {
        self.matches.iter().any(|m| m.score == 100)
    }

    /// Whether any candidate is a fuzzy match
    pub fn has_fuzzy_matches(&self) -> bool {
        self.matches.iter().any(|m| m.score < 100)
    }
}
