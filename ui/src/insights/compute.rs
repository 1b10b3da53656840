use std::cmp::Ordering;

use serde_json::Value;

use super::model::{InsightConfig, Insights, Kpi, MetricKey, RankedItem, SummaryPayload, SummaryRow};

/// KPI from the `overall/overall` row, else any `overall` row.
pub fn get_overall_kpi(rows: &[SummaryRow]) -> Option<Kpi> {
    rows.iter()
        .find(|r| r.metric_key == MetricKey::Overall && r.dim_path == "overall")
        .or_else(|| rows.iter().find(|r| r.metric_key == MetricKey::Overall))
        .map(Kpi::from)
}

pub fn by_metric(rows: &[SummaryRow], metric: MetricKey) -> Vec<SummaryRow> {
    rows.iter()
        .filter(|r| r.metric_key == metric)
        .cloned()
        .collect()
}

/// Classify `rows` into the overall KPI, dimension slices and ranked lists.
///
/// Ranked lists only draw from rows whose metric key is in
/// [`InsightConfig::focus_keys`] and are each capped at `top_n`.
pub fn compute_insights(rows: &[SummaryRow], cfg: &InsightConfig) -> Insights {
    let focus_keys = cfg.focus_keys();
    let focus: Vec<&SummaryRow> = rows
        .iter()
        .filter(|r| focus_keys.contains(&r.metric_key))
        .collect();

    let low_sample_gaps = ranked(
        focus
            .iter()
            .copied()
            .filter(|r| r.attempts > 0 && r.attempts < cfg.min_attempts)
            .collect(),
        cfg.top_n,
    );

    let strengths = ranked(
        sorted_by(
            focus.iter().copied().filter(|r| {
                r.attempts >= cfg.min_attempts && r.wilson_lb_95.unwrap_or(0.0) >= cfg.strong_wilson_lb
            }),
            |r| r.wilson_lb_95.unwrap_or(0.0),
            Ordering::reverse,
        ),
        cfg.top_n,
    );

    let weaknesses = ranked(
        sorted_by(
            focus.iter().copied().filter(|r| {
                r.attempts >= cfg.min_attempts && r.wilson_lb_95.unwrap_or(1.0) <= cfg.weak_wilson_lb
            }),
            |r| r.wilson_lb_95.unwrap_or(1.0),
            std::convert::identity,
        ),
        cfg.top_n,
    );

    let work_on_next_floor = cfg.min_attempts.max(cfg.work_on_next_min_attempts);
    let work_on_next = ranked(
        sorted_by(
            focus.iter().copied().filter(|r| {
                r.attempts >= work_on_next_floor && conservative_accuracy(r) < cfg.work_on_next_below
            }),
            conservative_accuracy,
            std::convert::identity,
        ),
        cfg.top_n,
    );

    let slow_outliers = ranked(
        sorted_by(
            focus.iter().copied().filter(|r| {
                r.median_rt_ms
                    .is_some_and(|ms| ms.is_finite() && ms >= cfg.slow_median_ms)
            }),
            |r| r.median_rt_ms.unwrap_or(0.0),
            Ordering::reverse,
        ),
        cfg.top_n,
    );

    Insights {
        overall: get_overall_kpi(rows),
        by_assessment_type: by_metric(rows, MetricKey::AssessmentType),
        by_difficulty: by_metric(rows, MetricKey::Difficulty),
        by_bloom: by_metric(rows, MetricKey::BloomLevel),
        strengths,
        weaknesses,
        work_on_next,
        slow_outliers,
        low_sample_gaps,
    }
}

/// [`compute_insights`] over raw JSON: a row array or a `{ data, error }`
/// wrapper. Unrecognised shapes produce empty insights.
pub fn compute_insights_from_json(value: &Value, cfg: &InsightConfig) -> Insights {
    compute_insights(SummaryPayload::from_value(value).rows(), cfg)
}

/// Wilson lower bound, else raw accuracy, else 1.
fn conservative_accuracy(row: &SummaryRow) -> f64 {
    row.wilson_lb_95.or(row.pct_correct).unwrap_or(1.0)
}

fn sorted_by<'a>(
    rows: impl Iterator<Item = &'a SummaryRow>,
    key: impl Fn(&SummaryRow) -> f64,
    direction: impl Fn(Ordering) -> Ordering,
) -> Vec<&'a SummaryRow> {
    let mut rows: Vec<_> = rows.collect();
    rows.sort_by(|a, b| direction(key(a).total_cmp(&key(b))));
    rows
}

fn ranked(rows: Vec<&SummaryRow>, top_n: usize) -> Vec<RankedItem> {
    rows.into_iter().take(top_n).map(RankedItem::from).collect()
}
