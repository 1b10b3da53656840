//! Counters for the user's default notebook.

use api::{NotebookCounts, NotebookRpc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{Store, Subscription, UserState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookState {
    pub notebook_id: Option<String>,
    pub counts: NotebookCounts,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotebookStore {
    state: Store<NotebookState>,
}

impl NotebookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Store<NotebookState> {
        &self.state
    }

    pub fn get(&self) -> NotebookState {
        self.state.get()
    }

    pub fn subscribe(&self, f: impl Fn(&NotebookState) + 'static) -> Subscription {
        self.state.subscribe(f)
    }

    /// Fetch fresh counts. On failure the previous value stays and the error
    /// is logged. Overlapping calls are not coordinated: whichever finishes
    /// last wins.
    pub async fn refresh<R: NotebookRpc>(&self, rpc: &R, user_id: &str, org_id: &str) {
        match rpc.ensure_default_and_counts(user_id, org_id).await {
            Ok(Some(snapshot)) => self.state.set(NotebookState {
                notebook_id: snapshot.notebook_id,
                counts: snapshot.counts.unwrap_or_default(),
            }),
            Ok(None) => {
                debug!(target: "kaizen::stores::notebook", %user_id, %org_id, "rpc returned no notebook");
            }
            Err(err) => {
                error!(
                    target: "kaizen::stores::notebook",
                    %user_id,
                    %org_id,
                    %err,
                    "error refreshing notebook counts"
                );
            }
        }
    }

    /// [`refresh`](Self::refresh) for the signed-in user and their current org.
    /// Does nothing until both are known.
    pub async fn refresh_for<R: NotebookRpc>(&self, rpc: &R, user: &UserState) {
        let (Some(user_id), Some(org)) = (user.user_id.as_deref(), user.current_org.as_ref()) else {
            debug!(target: "kaizen::stores::notebook", "skipping refresh without user and org");
            return;
        };
        self.refresh(rpc, user_id, &org.org_id).await;
    }

    pub fn reset(&self) {
        self.state.set(NotebookState::default());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use api::{NotebookSnapshot, RpcError};
    use futures::executor::block_on;

    use super::*;
    use crate::stores::Organization;

    /// Replays canned responses and records the arguments it was called with.
    #[derive(Default)]
    struct ScriptedRpc {
        replies: RefCell<VecDeque<Result<Option<NotebookSnapshot>, RpcError>>>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedRpc {
        fn reply(self, reply: Result<Option<NotebookSnapshot>, RpcError>) -> Self {
            self.replies.borrow_mut().push_back(reply);
            self
        }
    }

    impl NotebookRpc for ScriptedRpc {
        async fn ensure_default_and_counts(
            &self,
            user_id: &str,
            org_id: &str,
        ) -> Result<Option<NotebookSnapshot>, RpcError> {
            self.calls
                .borrow_mut()
                .push((user_id.to_string(), org_id.to_string()));
            self.replies.borrow_mut().pop_front().unwrap_or(Ok(None))
        }
    }

    fn snapshot(id: &str, pending: u32, active: u32, due: u32) -> NotebookSnapshot {
        NotebookSnapshot {
            notebook_id: Some(id.to_string()),
            counts: Some(NotebookCounts {
                pending_flags: pending,
                active_notes: active,
                due_today: due,
            }),
        }
    }

    #[test]
    fn refresh_replaces_state_on_success() {
        let store = NotebookStore::new();
        let rpc = ScriptedRpc::default().reply(Ok(Some(snapshot("nb-1", 2, 7, 3))));

        block_on(store.refresh(&rpc, "u-1", "org-9"));

        let state = store.get();
        assert_eq!(state.notebook_id.as_deref(), Some("nb-1"));
        assert_eq!(state.counts.active_notes, 7);
        assert_eq!(rpc.calls.borrow().as_slice(), [("u-1".to_string(), "org-9".to_string())]);
    }

    #[test]
    fn failure_and_empty_reply_keep_previous_value() {
        let store = NotebookStore::new();
        let rpc = ScriptedRpc::default()
            .reply(Ok(Some(snapshot("nb-1", 1, 1, 1))))
            .reply(Err(RpcError::Status {
                status: 500,
                body: "boom".into(),
            }))
            .reply(Ok(None));

        block_on(store.refresh(&rpc, "u", "o"));
        let before = store.get();
        block_on(store.refresh(&rpc, "u", "o"));
        block_on(store.refresh(&rpc, "u", "o"));

        assert_eq!(store.get(), before);
        assert_eq!(rpc.calls.borrow().len(), 3);
    }

    #[test]
    fn missing_counts_become_zero() {
        let store = NotebookStore::new();
        let rpc = ScriptedRpc::default().reply(Ok(Some(NotebookSnapshot {
            notebook_id: Some("nb-2".into()),
            counts: None,
        })));

        block_on(store.refresh(&rpc, "u", "o"));
        assert_eq!(store.get().counts, NotebookCounts::default());
        assert_eq!(store.get().notebook_id.as_deref(), Some("nb-2"));
    }

    #[test]
    fn refresh_for_needs_user_and_org() {
        let store = NotebookStore::new();
        let rpc = ScriptedRpc::default();

        let mut user = UserState {
            user_id: Some("u-1".into()),
            ..UserState::default()
        };
        block_on(store.refresh_for(&rpc, &user));
        assert!(rpc.calls.borrow().is_empty());

        user.current_org = Some(Organization {
            org_id: "org-1".into(),
            org_name: None,
            role_in_org: None,
        });
        block_on(store.refresh_for(&rpc, &user));
        assert_eq!(rpc.calls.borrow()[0].1, "org-1");
    }

    #[test]
    fn reset_notifies_with_zeroed_state() {
        let store = NotebookStore::new();
        let rpc = ScriptedRpc::default().reply(Ok(Some(snapshot("nb-1", 4, 5, 6))));
        block_on(store.refresh(&rpc, "u", "o"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store.subscribe(move |state| sink.borrow_mut().push(state.clone()));

        store.reset();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], NotebookState::default());
    }
}
