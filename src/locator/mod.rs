#[cfg(test)]
mod tests;

mod index;
mod matcher;
mod types;

pub use index::{FileIndex, build_file_index};
pub use matcher::{find_matches, find_missing_files};
pub use types::{FileMatch, MissingFileSearchResult};
