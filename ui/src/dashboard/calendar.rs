use dioxus::prelude::*;

use crate::calendar::{
    build_calendar_grid_fixed, build_month_labels, calendar_day_color, format_date_label, CalendarDay,
    CalendarStat,
};
use crate::core::format::as_percent;
use crate::i18n;
use crate::t;

/// Swatches shown in the legend, weakest to strongest.
const LEGEND: [Option<f64>; 6] = [Some(0.1), Some(0.4), Some(0.6), Some(0.78), Some(0.82), Some(0.9)];

#[component]
pub fn CalendarHeatmap(rows: Vec<CalendarStat>) -> Element {
    i18n::init();

    let grid = build_calendar_grid_fixed(&rows);
    let columns: Vec<(String, Vec<DayCell>)> = build_month_labels(&grid)
        .into_iter()
        .zip(grid.weeks())
        .map(|(label, week)| (label, week.iter().map(DayCell::from).collect()))
        .collect();

    let title = t!("dashboard-calendar-title");
    let less = t!("dashboard-calendar-legend-less");
    let more = t!("dashboard-calendar-legend-more");

    rsx! {
        section { class: "dashboard-card calendar-heatmap",
            div { class: "dashboard-card__header",
                h2 { "{title}" }
            }

            if rows.is_empty() {
                p { class: "dashboard-card__placeholder", {t!("dashboard-calendar-empty")} }
            }

            div { class: "calendar-heatmap__grid",
                for (index, (month, cells)) in columns.into_iter().enumerate() {
                    div { key: "{index}", class: "calendar-heatmap__week",
                        span { class: "calendar-heatmap__month", "{month}" }
                        for cell in cells {
                            span {
                                class: cell.class,
                                style: "background-color: {cell.color}",
                                title: "{cell.title}",
                            }
                        }
                    }
                }
            }

            div { class: "calendar-heatmap__legend",
                span { "{less}" }
                for accuracy in LEGEND {
                    span {
                        class: "calendar-heatmap__swatch",
                        style: "background-color: {calendar_day_color(accuracy)}",
                    }
                }
                span { "{more}" }
            }
        }
    }
}

struct DayCell {
    class: &'static str,
    color: &'static str,
    title: String,
}

impl From<&CalendarDay> for DayCell {
    fn from(day: &CalendarDay) -> Self {
        match day.stat_date.as_deref() {
            Some(date) if !day.is_dummy => DayCell {
                class: "calendar-heatmap__day",
                color: calendar_day_color(day.accuracy),
                title: format!(
                    "{} · {} · {}",
                    format_date_label(date),
                    as_percent(day.accuracy),
                    t!("dashboard-calendar-answered", count = day.answered.unwrap_or(0))
                ),
            },
            _ => DayCell {
                class: "calendar-heatmap__day calendar-heatmap__day--dummy",
                color: calendar_day_color(None),
                title: String::new(),
            },
        }
    }
}
