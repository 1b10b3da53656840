//! Display projections of [`Insights`]: badges, table rows, advice pills.

use serde::Serialize;

use super::model::{Insights, Kpi, MetricKey, RankedItem, SummaryRow};
use crate::core::format::{format_count, ms_to_words, to_pct};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiBadge {
    pub label: &'static str,
    pub value: String,
}

/// Accuracy, attempts and median response time, plus guessing share when
/// the backend estimated one.
pub fn to_kpi_badges(kpi: Option<&Kpi>) -> Vec<KpiBadge> {
    let Some(kpi) = kpi else {
        return Vec::new();
    };

    let mut badges = vec![
        KpiBadge {
            label: "Accuracy",
            value: to_pct(Some(kpi.accuracy), 1),
        },
        KpiBadge {
            label: "Attempts",
            value: format_count(kpi.attempts),
        },
        KpiBadge {
            label: "Median RT",
            value: ms_to_words(kpi.median_rt_ms),
        },
    ];
    if let Some(share) = kpi.guessing_share.filter(|s| s.is_finite()) {
        badges.push(KpiBadge {
            label: "Guessing Share",
            value: to_pct(Some(share), 1),
        });
    }
    badges
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub accuracy: String,
    pub wilson_lb: String,
    pub attempts: String,
    pub median_rt: String,
    pub dim_path: String,
    pub metric_key: MetricKey,
}

/// Anything that can be shown as a line of an insights table.
pub trait ToTableRow {
    fn to_table_row(&self) -> TableRow;
}

impl ToTableRow for RankedItem {
    fn to_table_row(&self) -> TableRow {
        TableRow {
            label: self.label.clone(),
            accuracy: to_pct(Some(self.accuracy), 1),
            wilson_lb: to_pct(Some(self.wilson_lb95), 1),
            attempts: format_count(self.attempts),
            median_rt: ms_to_words(self.median_rt_ms),
            dim_path: self.dim_path.clone(),
            metric_key: self.metric_key,
        }
    }
}

impl ToTableRow for SummaryRow {
    fn to_table_row(&self) -> TableRow {
        TableRow {
            label: self.label().to_string(),
            accuracy: to_pct(Some(self.pct_correct.filter(|v| v.is_finite()).unwrap_or(0.0)), 1),
            wilson_lb: to_pct(self.wilson_lb_95, 1),
            attempts: format_count(self.attempts),
            median_rt: ms_to_words(self.median_rt_ms),
            dim_path: self.dim_path.clone(),
            metric_key: self.metric_key,
        }
    }
}

pub fn to_table_rows<T: ToTableRow>(items: &[T]) -> Vec<TableRow> {
    items.iter().map(ToTableRow::to_table_row).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceTone {
    Pro,
    Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvicePill {
    pub text: &'static str,
    pub tone: AdviceTone,
}

const MAX_PILLS: usize = 5;

/// Short next-step suggestions. The first always reflects the overall lower
/// bound; the rest appear when the matching list is non-empty.
pub fn to_advice_pills(insights: &Insights) -> Vec<AdvicePill> {
    let lb = insights
        .overall
        .as_ref()
        .and_then(|kpi| kpi.wilson_lb95)
        .unwrap_or(0.0);

    let headline = if lb >= 0.9 {
        AdvicePill {
            text: "Keep momentum—try harder sets",
            tone: AdviceTone::Pro,
        }
    } else if lb >= 0.8 {
        AdvicePill {
            text: "Great base—mix in timed drills",
            tone: AdviceTone::Pro,
        }
    } else {
        AdvicePill {
            text: "Build consistency—short daily reps",
            tone: AdviceTone::Focus,
        }
    };

    let followups = [
        (
            !insights.slow_outliers.is_empty(),
            AdvicePill {
                text: "Pacing practice on a few topics",
                tone: AdviceTone::Focus,
            },
        ),
        (
            !insights.low_sample_gaps.is_empty(),
            AdvicePill {
                text: "Fill a couple of coverage gaps",
                tone: AdviceTone::Pro,
            },
        ),
        (
            !insights.work_on_next.is_empty(),
            AdvicePill {
                text: "Revisit tricky frequent items",
                tone: AdviceTone::Focus,
            },
        ),
    ];

    std::iter::once(headline)
        .chain(followups.into_iter().filter_map(|(show, pill)| show.then_some(pill)))
        .take(MAX_PILLS)
        .collect()
}

/// Coarse mastery level for a Wilson lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LbBand {
    Mastered,
    Strong,
    Developing,
    NeedsWork,
    Unknown,
}

impl LbBand {
    pub fn label(self) -> &'static str {
        match self {
            LbBand::Mastered => "Mastered",
            LbBand::Strong => "Strong",
            LbBand::Developing => "Developing",
            LbBand::NeedsWork => "Needs work",
            LbBand::Unknown => "Unknown",
        }
    }
}

pub fn band_from_lb(lb: Option<f64>) -> LbBand {
    match lb.filter(|v| v.is_finite()) {
        None => LbBand::Unknown,
        Some(v) if v >= 0.9 => LbBand::Mastered,
        Some(v) if v >= 0.8 => LbBand::Strong,
        Some(v) if v >= 0.7 => LbBand::Developing,
        Some(_) => LbBand::NeedsWork,
    }
}
