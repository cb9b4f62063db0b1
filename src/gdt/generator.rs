use std::collections::BTreeMap;
use std::path::PathBuf;

use super::types::AttachmentDefinition;

/// Render a definition file containing only the given attachment blocks.
///
/// The captured raw block text is emitted verbatim inside a file-level brace
/// pair, so the output round-trips byte-identically with the source blocks.
pub fn render_attachment_gdt(attachments: &[AttachmentDefinition]) -> String {
    let mut out = String::from("{\n");
    for attachment in attachments {
        out.push_str(&attachment.raw_block);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Group resolved attachments by the definition file they came from, so the
/// packaging step can emit one replacement file per source.
pub fn group_by_source(
    attachments: &[AttachmentDefinition],
) -> BTreeMap<PathBuf, Vec<&AttachmentDefinition>> {
    let mut groups: BTreeMap<PathBuf, Vec<&AttachmentDefinition>> = BTreeMap::new();
    for attachment in attachments {
        groups
            .entry(attachment.source_file.clone())
            .or_default()
            .push(attachment);
    }
    groups
}
