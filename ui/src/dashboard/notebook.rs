use dioxus::prelude::*;

use crate::i18n;
use crate::stores::{use_store, NotebookStore};
use crate::t;

/// Live counters for the user's default notebook.
#[component]
pub fn NotebookBadge(store: NotebookStore) -> Element {
    i18n::init();

    let state = use_store(store.state());
    let counts = state().counts;

    let counters = [
        ("notebook-badge__count--pending", t!("notebook-pending"), counts.pending_flags),
        ("notebook-badge__count--active", t!("notebook-active"), counts.active_notes),
        ("notebook-badge__count--due", t!("notebook-due"), counts.due_today),
    ];

    rsx! {
        div { class: "notebook-badge",
            for (modifier, label, value) in counters {
                span { class: "notebook-badge__count {modifier}",
                    span { class: "notebook-badge__value", "{value}" }
                    span { class: "notebook-badge__label", "{label}" }
                }
            }
        }
    }
}
