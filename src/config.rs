use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

/// Top-level run configuration, constructed once at startup and passed by
/// reference into each component. No ambient/global mutable state.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Directory holding the snapshot files (`"<id> - <title>.html"`).
    pub archive_dir: PathBuf,
    /// Root of the tree scanned for markdown files with share links.
    pub source_dir: PathBuf,
    /// Where the plain-text change report is written for the calling
    /// workflow (e.g. `.git/commit-msg`).
    pub report_path: PathBuf,
    /// Maximum number of captures in flight at once.
    pub concurrency: usize,
    pub capture: CaptureConfig,
}

impl ArchiveConfig {
    pub fn trace_loaded(&self) {
        info!(
            archive_dir = %self.archive_dir.display(),
            source_dir = %self.source_dir.display(),
            report_path = %self.report_path.display(),
            concurrency = self.concurrency,
            "Loaded ArchiveConfig"
        );
        debug!(?self, "ArchiveConfig loaded (full debug)");
    }
}

/// Tunables and payloads for the snapshot pipeline.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Prefix the conversation id is appended to, e.g.
    /// `https://gemini.google.com/share`.
    pub share_base_url: String,
    /// Selector whose presence marks the conversation as rendered.
    pub ready_selector: String,
    /// Upper bound on the readiness wait.
    pub ready_timeout: Duration,
    /// Fixed delay after the marker appears, letting late asynchronous
    /// content finish rendering. A heuristic, not a protocol guarantee.
    pub settle_delay: Duration,
    pub scripts: ScriptBundle,
}

impl CaptureConfig {
    pub fn share_url(&self, id: &str) -> String {
        format!("{}/{}", self.share_base_url.trim_end_matches('/'), id)
    }
}

/// The three script payloads injected into or passed to the page: the
/// low-level hook, the single-file serializer itself, and the auxiliary zip
/// script handed to `getPageData` for archive-packaging support.
#[derive(Clone)]
pub struct ScriptBundle {
    pub hook: String,
    pub page: String,
    pub zip: String,
}

// The payloads are hundreds of kilobytes; Debug prints sizes only.
impl std::fmt::Debug for ScriptBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptBundle")
            .field("hook_bytes", &self.hook.len())
            .field("page_bytes", &self.page.len())
            .field("zip_bytes", &self.zip.len())
            .finish()
    }
}
