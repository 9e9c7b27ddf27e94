//! High-level pipeline: discover → reconcile → delete/capture → report.
//!
//! This module orchestrates one archive run. It takes read-only snapshots of
//! the desired set (share links found in markdown files) and the archive
//! index (files on disk), computes the difference, deletes stale snapshots,
//! captures missing ones with bounded concurrency, and writes a change
//! report for the calling workflow.
//!
//! # Error Handling
//! Per-conversation capture failures are isolated inside the executor and
//! surface only in the report. Errors that invalidate the baseline (archive
//! directory unreadable, discovery failing, report unwritable) abort the
//! whole run, since no partial result is meaningful without a valid index.

use std::collections::BTreeSet;
use std::fs;

use tracing::{error, info, warn};

use crate::capture::Capturer;
use crate::config::ArchiveConfig;
use crate::contract::{Artifact, Browser, CaptureError, ConversationId};
use crate::{discover, executor, reconcile, report, store};

/// What one run changed, for downstream audit and the emitted report.
#[derive(Debug)]
pub struct SynchroniseReport {
    /// Successfully captured and written. Failed ids are not listed here.
    pub added: Vec<ConversationId>,
    /// Stale ids whose snapshots were deleted.
    pub removed: Vec<ConversationId>,
    /// Ids whose capture or write failed; their siblings are unaffected.
    pub failed: Vec<ConversationId>,
    /// The plain-text change summary, also written to the report path.
    pub message: String,
}

pub async fn synchronise<B>(
    config: &ArchiveConfig,
    browser: &B,
) -> Result<SynchroniseReport, String>
where
    B: Browser + ?Sized,
{
    info!("[SYNC] Starting conversation archive synchronisation");

    if let Err(e) = fs::create_dir_all(&config.archive_dir) {
        error!(error = ?e, dir = %config.archive_dir.display(), "[SYNC][ERROR] Failed to create archive directory");
        return Err(format!("Failed to create archive directory: {e}"));
    }

    // --- Step 1: take the two read-only baselines ---
    let desired = match discover::conversation_ids(&config.source_dir) {
        Ok(ids) => {
            info!(count = ids.len(), "[SYNC] Discovered referenced conversations");
            ids
        }
        Err(e) => {
            error!(error = ?e, dir = %config.source_dir.display(), "[SYNC][ERROR] Discovery failed");
            return Err(format!("Failed to scan source files: {e}"));
        }
    };

    let index = match store::list(&config.archive_dir) {
        Ok(index) => {
            info!(count = index.len(), "[SYNC] Listed archived conversations");
            index
        }
        Err(e) => {
            error!(error = ?e, dir = %config.archive_dir.display(), "[SYNC][ERROR] Failed to read archive directory");
            return Err(format!("Failed to read archive directory: {e}"));
        }
    };
    let archived: BTreeSet<ConversationId> = index.keys().cloned().collect();

    // --- Step 2: reconcile ---
    let plan = reconcile::reconcile(&desired, &archived);
    info!(
        to_add = plan.to_add.len(),
        to_remove = plan.to_remove.len(),
        "[SYNC] Reconciliation complete"
    );

    // --- Step 3: delete stale snapshots ---
    for id in &plan.to_remove {
        // The id came from the index, so the filename lookup cannot miss
        // within this run.
        if let Some(filename) = index.get(id) {
            if !store::delete(&config.archive_dir, filename) {
                warn!(id = %id, filename = %filename, "[SYNC] Stale snapshot was already gone");
            }
        }
    }

    // --- Step 4: capture missing conversations, bounded concurrency ---
    let capturer = Capturer::new(config.capture.clone());
    let capturer_ref = &capturer;
    let archive_dir = config.archive_dir.as_path();
    let outcome = executor::run_all(
        &plan.to_add,
        config.concurrency,
        move |id: ConversationId| async move { capturer_ref.capture(browser, &id).await },
        move |_id: ConversationId, artifact: Artifact| async move {
            store::write(archive_dir, &artifact.filename, artifact.content.as_bytes())
                .map_err(CaptureError::Io)
        },
    )
    .await;

    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "[SYNC] Capture run finished"
    );

    // --- Step 5: build and emit the change report ---
    let added: Vec<ConversationId> = outcome.succeeded.into_iter().collect();
    let removed: Vec<ConversationId> = plan.to_remove.into_iter().collect();
    let failed: Vec<ConversationId> = outcome.failed.into_iter().collect();

    let message = report::build(&added, &removed);
    if let Err(e) = fs::write(&config.report_path, &message) {
        error!(error = ?e, path = %config.report_path.display(), "[SYNC][ERROR] Failed to write change report");
        return Err(format!("Failed to write change report: {e}"));
    }
    info!(path = %config.report_path.display(), "[SYNC] Wrote change report");

    Ok(SynchroniseReport {
        added,
        removed,
        failed,
        message,
    })
}
