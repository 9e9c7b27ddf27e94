//! Discovery of the desired conversation set: walk the source tree for
//! markdown files and extract every referenced share id.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use tracing::{debug, error};

use crate::contract::ConversationId;

// Id extraction stops at the first slash or whitespace.
static SHARE_URL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"https://(?:gemini\.google\.com|g\.co/gemini)/share/(?P<id>[^/\s]+)")
        .unwrap()
});

/// Scan `source_dir` recursively for `*.md` files and collect every share id
/// they reference. Insertion order is irrelevant and duplicates collapse.
pub fn conversation_ids(source_dir: &Path) -> std::io::Result<BTreeSet<ConversationId>> {
    let mut ids = BTreeSet::new();
    visit_dir(source_dir, &mut ids)?;
    debug!(count = ids.len(), "Discovered conversation ids from markdown files");
    Ok(ids)
}

fn visit_dir(dir: &Path, ids: &mut BTreeSet<ConversationId>) -> std::io::Result<()> {
    for entry_res in fs::read_dir(dir)? {
        let entry = entry_res?;
        let path = entry.path();
        if path.is_dir() {
            // Skip VCS and build output directories
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if dir_name == ".git" || dir_name == "target" || dir_name == "node_modules" {
                debug!(path = %path.display(), "Skipping directory");
                continue;
            }
            visit_dir(&path, ids)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = ?e, path = %path.display(), "Failed to read markdown file");
                    return Err(e);
                }
            };
            for caps in SHARE_URL_RE.captures_iter(&text) {
                let id = caps["id"].to_string();
                debug!(id = %id, file = %path.display(), "Found share link");
                ids.insert(id);
            }
        }
    }
    Ok(())
}
