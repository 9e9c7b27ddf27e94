//! Change summary for the calling workflow, emitted as commit-message text.

use crate::contract::ConversationId;

/// Build the fixed-header change summary. The "added" and "deleted" lines
/// are omitted when their set is empty; output is deterministic given the
/// same inputs in the same order.
pub fn build(added: &[ConversationId], removed: &[ConversationId]) -> String {
    let mut msg = String::from("chore: Automatic conversation archive\n");

    if !added.is_empty() {
        msg.push_str(&format!("\nAdded conversations: {}", added.join(", ")));
    }
    if !removed.is_empty() {
        msg.push_str(&format!("\nDeleted conversations: {}", removed.join(", ")));
    }

    msg
}
