use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::format::PLACEHOLDER;

/// Which dimension a summary row aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Overall,
    AssessmentType,
    Difficulty,
    BloomLevel,
    Subject,
    Topic,
    Subtopic,
    #[serde(other)]
    Other,
}

/// One aggregated performance bucket from the analytics query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub metric_key: MetricKey,
    pub dim_path: String,
    #[serde(default)]
    pub dim_scope: Option<String>,

    #[serde(default)]
    pub assessment_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub bloom_level: Option<String>,

    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub subject_label: Option<String>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub topic_label: Option<String>,
    #[serde(default)]
    pub subtopic_id: Option<i64>,
    #[serde(default)]
    pub subtopic_label: Option<String>,

    #[serde(default, deserialize_with = "count_or_zero")]
    pub attempts: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub correct: u64,
    /// k/n in 0..=1
    #[serde(default)]
    pub pct_correct: Option<f64>,
    #[serde(default)]
    pub wilson_lb_95: Option<f64>,
    #[serde(default)]
    pub avg_rt_ms: Option<f64>,
    #[serde(default)]
    pub median_rt_ms: Option<f64>,
    #[serde(default)]
    pub speed_accuracy_corr: Option<f64>,
    #[serde(default)]
    pub expected_correct_by_chance: Option<f64>,
    #[serde(default)]
    pub guessing_share: Option<f64>,
    #[serde(default)]
    pub excess_correct_over_chance: Option<f64>,

    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Whole(u64),
    Float(f64),
}

/// `null` reads as zero; whole floats such as `12.0` are accepted.
fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Option::<RawCount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawCount::Whole(n)) => Ok(n),
        Some(RawCount::Float(n)) if n >= 0.0 && n.fract() == 0.0 => Ok(n as u64),
        Some(RawCount::Float(n)) => Err(de::Error::custom(format!("invalid count {n}"))),
    }
}

impl SummaryRow {
    /// Most specific human label the row carries.
    pub fn label(&self) -> &str {
        [
            &self.subtopic_label,
            &self.topic_label,
            &self.subject_label,
            &self.assessment_type,
            &self.difficulty,
            &self.bloom_level,
        ]
        .into_iter()
        .find_map(|label| label.as_deref())
        .or_else(|| Some(self.dim_path.as_str()).filter(|path| !path.is_empty()))
        .unwrap_or(PLACEHOLDER)
    }
}

/// Headline numbers taken from the `overall` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub attempts: u64,
    pub correct: u64,
    pub accuracy: f64,
    #[serde(rename = "wilsonLB95")]
    pub wilson_lb95: Option<f64>,
    pub avg_rt_ms: Option<f64>,
    pub median_rt_ms: Option<f64>,
    pub speed_accuracy_corr: Option<f64>,
    pub guessing_share: Option<f64>,
    pub excess_correct_over_chance: Option<f64>,
}

impl From<&SummaryRow> for Kpi {
    fn from(row: &SummaryRow) -> Self {
        Self {
            attempts: row.attempts,
            correct: row.correct,
            accuracy: row.pct_correct.unwrap_or(0.0),
            wilson_lb95: row.wilson_lb_95,
            avg_rt_ms: row.avg_rt_ms,
            median_rt_ms: row.median_rt_ms,
            speed_accuracy_corr: row.speed_accuracy_corr,
            guessing_share: row.guessing_share,
            excess_correct_over_chance: row.excess_correct_over_chance,
        }
    }
}

/// A summary row picked for one of the ranked lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    #[serde(rename = "key")]
    pub label: String,
    pub metric_key: MetricKey,
    pub attempts: u64,
    pub accuracy: f64,
    #[serde(rename = "wilsonLB95")]
    pub wilson_lb95: f64,
    #[serde(rename = "medianRtMs")]
    pub median_rt_ms: Option<f64>,
    pub subject_label: Option<String>,
    pub topic_label: Option<String>,
    pub subtopic_label: Option<String>,
    pub dim_path: String,
    /// Source row, for drill-through.
    pub row: SummaryRow,
}

impl From<&SummaryRow> for RankedItem {
    fn from(row: &SummaryRow) -> Self {
        Self {
            label: row.label().to_string(),
            metric_key: row.metric_key,
            attempts: row.attempts,
            accuracy: row.pct_correct.unwrap_or(0.0),
            wilson_lb95: row.wilson_lb_95.unwrap_or(0.0),
            median_rt_ms: row.median_rt_ms,
            subject_label: row.subject_label.clone(),
            topic_label: row.topic_label.clone(),
            subtopic_label: row.subtopic_label.clone(),
            dim_path: row.dim_path.clone(),
            row: row.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub overall: Option<Kpi>,
    pub by_assessment_type: Vec<SummaryRow>,
    pub by_difficulty: Vec<SummaryRow>,
    pub by_bloom: Vec<SummaryRow>,

    pub strengths: Vec<RankedItem>,
    pub weaknesses: Vec<RankedItem>,
    /// Heavily practised but still below target.
    #[serde(rename = "highAttemptsLowAccuracy")]
    pub work_on_next: Vec<RankedItem>,
    pub slow_outliers: Vec<RankedItem>,
    pub low_sample_gaps: Vec<RankedItem>,
}

/// Thresholds for [`compute_insights`](super::compute_insights).
///
/// Deserializes from a partial camelCase object; absent fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightConfig {
    /// Attempts needed before a rate is trusted.
    pub min_attempts: u64,
    #[serde(rename = "strongWilsonLB")]
    pub strong_wilson_lb: f64,
    #[serde(rename = "weakWilsonLB")]
    pub weak_wilson_lb: f64,
    pub slow_median_ms: f64,
    /// Reference only; nothing ranks on it.
    pub fast_median_ms: f64,
    pub top_n: usize,
    /// Empty means the subtopic/topic/subject default.
    pub focus_metric_keys: Vec<MetricKey>,
    pub work_on_next_min_attempts: u64,
    pub work_on_next_below: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_attempts: 5,
            strong_wilson_lb: 0.8,
            weak_wilson_lb: 0.5,
            slow_median_ms: 30_000.0,
            fast_median_ms: 4_000.0,
            top_n: 8,
            focus_metric_keys: InsightConfig::DEFAULT_FOCUS.to_vec(),
            work_on_next_min_attempts: 10,
            work_on_next_below: 0.75,
        }
    }
}

impl InsightConfig {
    pub const DEFAULT_FOCUS: [MetricKey; 3] =
        [MetricKey::Subtopic, MetricKey::Topic, MetricKey::Subject];

    pub fn focus_keys(&self) -> &[MetricKey] {
        if self.focus_metric_keys.is_empty() {
            &Self::DEFAULT_FOCUS
        } else {
            &self.focus_metric_keys
        }
    }
}

/// Analytics query output as it reaches the client: a bare row array or a
/// `{ data, error }` response wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPayload {
    Rows(Vec<SummaryRow>),
    Response {
        data: Vec<SummaryRow>,
        error: Option<Value>,
    },
}

impl SummaryPayload {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => match map.get("data") {
                Some(data @ Value::Array(_)) => SummaryPayload::Response {
                    data: parse_summary_rows(data),
                    error: map.get("error").filter(|e| !e.is_null()).cloned(),
                },
                _ => SummaryPayload::Rows(Vec::new()),
            },
            other => SummaryPayload::Rows(parse_summary_rows(other)),
        }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        match self {
            SummaryPayload::Rows(rows) => rows,
            SummaryPayload::Response { data, .. } => data,
        }
    }

    pub fn into_rows(self) -> Vec<SummaryRow> {
        match self {
            SummaryPayload::Rows(rows) => rows,
            SummaryPayload::Response { data, .. } => data,
        }
    }
}

/// Keep the elements of a JSON array that look like summary rows.
///
/// An element needs string `metric_key` and `dim_path` and must decode;
/// anything else is skipped. Non-arrays yield nothing.
pub fn parse_summary_rows(value: &Value) -> Vec<SummaryRow> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| {
            item.get("metric_key").is_some_and(Value::is_string)
                && item.get("dim_path").is_some_and(Value::is_string)
        })
        .filter_map(|item| match SummaryRow::deserialize(item) {
            Ok(row) => Some(row),
            Err(err) => {
                debug!(target: "kaizen::insights", error = %err, "skipping malformed summary row");
                None
            }
        })
        .collect()
}
