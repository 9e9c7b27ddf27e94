//! Set reconciliation between the desired and archived conversation sets.

use std::collections::BTreeSet;

use crate::contract::ConversationId;

/// Result of one reconciliation, computed once per run and never mutated.
///
/// `to_add` and `to_remove` are disjoint by construction. BTreeSets keep
/// iteration deterministic for logs and tests, but callers must not depend
/// on any particular order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Desired but not yet archived.
    pub to_add: BTreeSet<ConversationId>,
    /// Archived but no longer referenced anywhere.
    pub to_remove: BTreeSet<ConversationId>,
}

/// Pure set difference: `to_add = desired − archived`,
/// `to_remove = archived − desired`.
///
/// An empty desired set is a valid full teardown, not an error.
pub fn reconcile(
    desired: &BTreeSet<ConversationId>,
    archived: &BTreeSet<ConversationId>,
) -> ReconciliationResult {
    ReconciliationResult {
        to_add: desired.difference(archived).cloned().collect(),
        to_remove: archived.difference(desired).cloned().collect(),
    }
}
