//! # store: the on-disk snapshot archive
//!
//! The archive directory is the sole persisted state: files named
//! `"<id> - <title>.html"`. This module rebuilds the id → filename index by
//! scanning the directory, and performs the physical writes and deletes.
//! Files not matching the schema are invisible to the index: never deleted,
//! never double-counted.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::contract::ConversationId;

/// Longest sanitized title kept in a filename, measured in encoded bytes
/// (not characters) to avoid platform path-length failures.
pub const MAX_TITLE_BYTES: usize = 100;

// Conversation ids use the same charset discovery extracts: a URL path
// segment, i.e. anything but slash or whitespace. The charset contains no
// space, so the first " - " in a filename always terminates the id; a
// future id scheme allowing " - " would make this parse ambiguous.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<id>[^/\s]+) - .*\.html$").unwrap());

static ILLEGAL_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|\n]"#).unwrap());

/// Scan the archive directory and build the `{id → filename}` index.
///
/// An unreadable directory is an error (the run has no valid baseline
/// without the index); an individual non-matching filename is not.
pub fn list(dir: &Path) -> io::Result<BTreeMap<ConversationId, String>> {
    let mut index = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!(file = ?name, "Skipping non-UTF-8 filename in archive");
            continue;
        };
        if let Some((id, _)) = parse_filename(name) {
            index.insert(id.to_string(), name.to_string());
        } else {
            debug!(file = name, "Skipping file outside the snapshot schema");
        }
    }
    Ok(index)
}

/// Write one snapshot file, returning the number of bytes written.
///
/// The content goes to a temporary name first and is renamed into place only
/// once fully written, so a mid-write failure never leaves a truncated
/// snapshot behind under the schema name. The temporary name does not match
/// the schema and is invisible to [`list`].
pub fn write(dir: &Path, filename: &str, content: &[u8]) -> io::Result<u64> {
    let path = dir.join(filename);
    let tmp_path = dir.join(format!(".{filename}.tmp"));

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, &path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    debug!(path = %path.display(), bytes = content.len(), "Wrote snapshot");
    Ok(content.len() as u64)
}

/// Delete one snapshot file. Returns whether a file was actually removed;
/// absence is not an error (idempotent delete).
pub fn delete(dir: &Path, filename: &str) -> bool {
    let path = dir.join(filename);
    match fs::remove_file(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "Deleted stale snapshot");
            true
        }
        Err(e) => {
            warn!(error = ?e, path = %path.display(), "Snapshot delete was a no-op");
            false
        }
    }
}

/// Split a filename into `(id, title)` when it matches the snapshot schema.
pub fn parse_filename(name: &str) -> Option<(&str, &str)> {
    let caps = FILENAME_RE.captures(name)?;
    let id = caps.name("id")?;
    // Between "<id> - " and ".html".
    let title = &name[id.end() + 3..name.len() - 5];
    Some((id.as_str(), title))
}

/// Build the archive filename for a captured conversation:
/// strip characters illegal in filenames from the title, truncate it to
/// [`MAX_TITLE_BYTES`] without splitting a multi-byte character, and format
/// `"<id> - <title>.html"`.
pub fn snapshot_filename(id: &ConversationId, title: &str) -> String {
    let sanitized = ILLEGAL_FILENAME_CHARS.replace_all(title, "");
    let truncated = truncate_on_char_boundary(&sanitized, MAX_TITLE_BYTES);
    format!("{id} - {truncated}.html")
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
