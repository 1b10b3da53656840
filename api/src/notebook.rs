//! Notebook counters returned by `rpc_notes_ensure_default_and_counts`.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

/// Name of the backend function that creates the user's default notebook if
/// needed and returns its counters.
pub const ENSURE_DEFAULT_AND_COUNTS: &str = "rpc_notes_ensure_default_and_counts";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookCounts {
    #[serde(default)]
    pub pending_flags: u32,
    #[serde(default)]
    pub active_notes: u32,
    #[serde(default)]
    pub due_today: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookSnapshot {
    #[serde(default)]
    pub notebook_id: Option<String>,
    /// Absent or `null` counts are reported as zeroes by the store.
    #[serde(default)]
    pub counts: Option<NotebookCounts>,
}

/// Contract used by the notebook store. `Ok(None)` means the call succeeded
/// but returned no row.
pub trait NotebookRpc {
    fn ensure_default_and_counts(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> impl Future<Output = Result<Option<NotebookSnapshot>, RpcError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_tolerates_missing_counts() {
        let snap: NotebookSnapshot =
            serde_json::from_value(json!({ "notebook_id": "nb-1" })).unwrap();
        assert_eq!(snap.notebook_id.as_deref(), Some("nb-1"));
        assert!(snap.counts.is_none());

        let snap: NotebookSnapshot = serde_json::from_value(json!({
            "notebook_id": "nb-2",
            "counts": { "pending_flags": 2, "due_today": 1 }
        }))
        .unwrap();
        assert_eq!(
            snap.counts,
            Some(NotebookCounts {
                pending_flags: 2,
                active_notes: 0,
                due_today: 1,
            })
        );
    }
}
