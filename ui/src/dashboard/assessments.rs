use std::collections::HashSet;

use dioxus::prelude::*;

use crate::assessments::{
    filter_by_type, mastery_color, sort_assessments, AssessmentCard, AssessmentType, SortDir, SortKey,
};
use crate::core::datetime::{format_human, HumanFormat, Style};
use crate::core::format::PLACEHOLDER;
use crate::i18n;
use crate::t;

const SORT_KEYS: [SortKey; 4] = [SortKey::Date, SortKey::Title, SortKey::Type, SortKey::Score];

#[component]
pub fn AssessmentList(cards: Vec<AssessmentCard>) -> Element {
    i18n::init();

    let mut sort_key = use_signal(SortKey::default);
    let mut sort_dir = use_signal(SortDir::default);
    let mut enabled = use_signal(|| AssessmentType::ALL.into_iter().collect::<HashSet<_>>());

    let visible: Vec<CardRow> = sort_assessments(&filter_by_type(&cards, &enabled()), sort_key(), sort_dir())
        .iter()
        .map(CardRow::from)
        .collect();

    let sort_buttons: Vec<(SortKey, &'static str, String)> = SORT_KEYS
        .into_iter()
        .map(|key| {
            let class = if key == sort_key() {
                "assessment-list__sort assessment-list__sort--active"
            } else {
                "assessment-list__sort"
            };
            (key, class, sort_key_label(key))
        })
        .collect();
    let filter_buttons: Vec<(AssessmentType, bool)> = AssessmentType::ALL
        .into_iter()
        .map(|kind| (kind, enabled().contains(&kind)))
        .collect();

    let title = t!("dashboard-assessments-title");
    let sort_label = t!("dashboard-assessments-sort");
    let dir_label = match sort_dir() {
        SortDir::Asc => t!("sort-asc"),
        SortDir::Desc => t!("sort-desc"),
    };

    rsx! {
        section { class: "dashboard-card assessment-list",
            div { class: "dashboard-card__header",
                h2 { "{title}" }
                span { class: "dashboard-card__meta", "{visible.len()}" }
            }

            div { class: "assessment-list__controls",
                span { class: "assessment-list__controls-label", "{sort_label}" }
                for (key, class, label) in sort_buttons {
                    button {
                        r#type: "button",
                        class,
                        onclick: move |_| {
                            if key == sort_key() {
                                sort_dir.set(sort_dir().toggled());
                            } else {
                                sort_key.set(key);
                            }
                        },
                        "{label}"
                    }
                }
                span { class: "assessment-list__direction", "{dir_label}" }
            }

            div { class: "assessment-list__filters",
                for (kind, pressed) in filter_buttons {
                    button {
                        r#type: "button",
                        class: "assessment-list__filter",
                        aria_pressed: "{pressed}",
                        onclick: move |_| {
                            enabled.with_mut(|types| {
                                if !types.remove(&kind) {
                                    types.insert(kind);
                                }
                            });
                        },
                        "{kind.default_label()}"
                    }
                }
            }

            if visible.is_empty() {
                p { class: "dashboard-card__placeholder", {t!("dashboard-assessments-empty")} }
            } else {
                ul { class: "assessment-list__items",
                    for row in visible {
                        li { key: "{row.id}", class: "assessment-list__item",
                            span {
                                class: "assessment-list__swatch",
                                style: "background-color: {row.color}",
                            }
                            div { class: "assessment-list__body",
                                span { class: "assessment-list__title", "{row.title}" }
                                span { class: "assessment-list__type", "{row.kind}" }
                                span { class: "assessment-list__date", "{row.date}" }
                            }
                            if let Some(pct) = row.progress {
                                progress { class: "assessment-list__progress", max: "100", value: "{pct}" }
                            }
                            span { class: "assessment-list__score", "{row.score}" }
                        }
                    }
                }
            }
        }
    }
}

fn sort_key_label(key: SortKey) -> String {
    match key {
        SortKey::Date => t!("sort-date"),
        SortKey::Title => t!("sort-title"),
        SortKey::Type => t!("sort-type"),
        SortKey::Score => t!("sort-score"),
    }
}

struct CardRow {
    id: String,
    title: String,
    kind: &'static str,
    date: String,
    score: String,
    color: &'static str,
    progress: Option<u8>,
}

impl From<&AssessmentCard> for CardRow {
    fn from(card: &AssessmentCard) -> Self {
        CardRow {
            id: card.instance_id.clone(),
            title: card.title.clone(),
            kind: card.kind.default_label(),
            date: card
                .sort_date()
                .map(|date| format_human(date, &HumanFormat::date_only(Style::Medium)))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            score: card
                .score
                .map(|score| format!("{score:.0}%"))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            color: mastery_color(card.score),
            progress: card.progress_percent(),
        }
    }
}
