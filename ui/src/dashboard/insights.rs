use dioxus::prelude::*;

use crate::i18n;
use crate::insights::{
    band_from_lb, compute_insights, to_advice_pills, to_kpi_badges, to_table_rows, AdviceTone,
    InsightConfig, SummaryRow, TableRow,
};
use crate::t;

#[component]
pub fn InsightsPanel(rows: Vec<SummaryRow>, #[props(default)] config: InsightConfig) -> Element {
    i18n::init();

    let insights = compute_insights(&rows, &config);
    let badges = to_kpi_badges(insights.overall.as_ref());
    let pills = to_advice_pills(&insights);
    let band = band_from_lb(insights.overall.as_ref().and_then(|kpi| kpi.wilson_lb95));

    let sections = [
        (t!("insights-strengths"), to_table_rows(&insights.strengths)),
        (t!("insights-weaknesses"), to_table_rows(&insights.weaknesses)),
        (t!("insights-work-on-next"), to_table_rows(&insights.work_on_next)),
        (t!("insights-slow"), to_table_rows(&insights.slow_outliers)),
        (t!("insights-gaps"), to_table_rows(&insights.low_sample_gaps)),
    ];

    let title = t!("insights-title");

    rsx! {
        section { class: "dashboard-card insights-panel",
            div { class: "dashboard-card__header",
                h2 { "{title}" }
                if insights.overall.is_some() {
                    span { class: "insights-panel__band", "{band.label()}" }
                }
            }

            if rows.is_empty() {
                p { class: "dashboard-card__placeholder", {t!("insights-no-data")} }
            } else {
                div { class: "insights-panel__badges",
                    for badge in badges {
                        div { class: "insights-panel__badge",
                            span { class: "insights-panel__badge-label", "{badge.label}" }
                            span { class: "insights-panel__badge-value", "{badge.value}" }
                        }
                    }
                }

                ul { class: "insights-panel__pills",
                    for pill in pills {
                        li { class: pill_class(pill.tone), "{pill.text}" }
                    }
                }

                for (heading, table) in sections {
                    if !table.is_empty() {
                        {render_table(heading, table)}
                    }
                }
            }
        }
    }
}

fn pill_class(tone: AdviceTone) -> &'static str {
    match tone {
        AdviceTone::Pro => "insights-panel__pill insights-panel__pill--pro",
        AdviceTone::Focus => "insights-panel__pill insights-panel__pill--focus",
    }
}

fn render_table(heading: String, rows: Vec<TableRow>) -> Element {
    let topic = t!("insights-col-topic");
    let accuracy = t!("insights-col-accuracy");
    let lower_bound = t!("insights-col-lower-bound");
    let attempts = t!("insights-col-attempts");
    let median = t!("insights-col-median");

    rsx! {
        div { class: "insights-panel__section",
            h3 { "{heading}" }
            table { class: "insights-panel__table",
                thead {
                    tr {
                        th { "{topic}" }
                        th { "{accuracy}" }
                        th { "{lower_bound}" }
                        th { "{attempts}" }
                        th { "{median}" }
                    }
                }
                tbody {
                    for row in rows {
                        tr { key: "{row.dim_path}", title: "{row.dim_path}",
                            td { "{row.label}" }
                            td { "{row.accuracy}" }
                            td { "{row.wilson_lb}" }
                            td { "{row.attempts}" }
                            td { "{row.median_rt}" }
                        }
                    }
                }
            }
        }
    }
}
