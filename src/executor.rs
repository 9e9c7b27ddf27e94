//! # executor: bounded-concurrency capture runner
//!
//! Runs capture jobs with a fixed concurrency ceiling. One job's failure is
//! logged and collected, never thrown past this boundary, and never cancels
//! or blocks sibling jobs. A successful capture is handed to the sink (the
//! archive write) before the job counts as succeeded; a sink failure is a
//! job failure. The call returns only after every job is terminal.

use std::collections::BTreeSet;
use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::contract::{Artifact, CaptureError, ConversationId};

/// Terminal per-id outcome sets of one run. Disjoint; their union is the
/// submitted id set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub succeeded: BTreeSet<ConversationId>,
    pub failed: BTreeSet<ConversationId>,
}

/// Run every id through `capture` with at most `concurrency` jobs in flight,
/// writing successful artifacts through `sink`.
pub async fn run_all<Cap, CapFut, Sink, SinkFut>(
    ids: &BTreeSet<ConversationId>,
    concurrency: usize,
    capture: Cap,
    sink: Sink,
) -> RunOutcome
where
    Cap: Fn(ConversationId) -> CapFut,
    CapFut: Future<Output = Result<Artifact, CaptureError>>,
    Sink: Fn(ConversationId, Artifact) -> SinkFut,
    SinkFut: Future<Output = Result<u64, CaptureError>>,
{
    let capture = &capture;
    let sink = &sink;

    let results: Vec<(ConversationId, bool)> = stream::iter(ids.iter().cloned())
        .map(|id| async move {
            match capture(id.clone()).await {
                Ok(artifact) => {
                    let filename = artifact.filename.clone();
                    match sink(id.clone(), artifact).await {
                        Ok(bytes) => {
                            info!(id = %id, filename = %filename, bytes, "Archived conversation");
                            (id, true)
                        }
                        Err(e) => {
                            error!(id = %id, error = %e, "Failed to store snapshot");
                            (id, false)
                        }
                    }
                }
                Err(e) => {
                    error!(id = %id, error = %e, "Failed to archive conversation");
                    (id, false)
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = RunOutcome::default();
    for (id, ok) in results {
        if ok {
            outcome.succeeded.insert(id);
        } else {
            outcome.failed.insert(id);
        }
    }
    outcome
}
