//! Assessment cards as listed on the dashboard, plus sort/filter helpers.

mod utils;

pub use utils::{filter_by_type, mastery_color, sort_assessments, MasteryBand};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    Prompt,
    ShortQuiz,
    LongQuiz,
    MockExam,
}

impl AssessmentType {
    pub const ALL: [AssessmentType; 4] = [
        AssessmentType::Prompt,
        AssessmentType::ShortQuiz,
        AssessmentType::LongQuiz,
        AssessmentType::MockExam,
    ];

    /// Wire name, e.g. `short_quiz`.
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentType::Prompt => "prompt",
            AssessmentType::ShortQuiz => "short_quiz",
            AssessmentType::LongQuiz => "long_quiz",
            AssessmentType::MockExam => "mock_exam",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            AssessmentType::Prompt => "Prompt",
            AssessmentType::ShortQuiz => "Short quiz",
            AssessmentType::LongQuiz => "Long quiz",
            AssessmentType::MockExam => "Mock exam",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Assigned,
    InProgress,
    Completed,
}

/// One assigned or attempted assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentCard {
    pub instance_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    #[serde(default)]
    pub status: AssessmentStatus,
    /// 0..=100
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub raw_score: Option<f64>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub answered_items: Option<u32>,
    /// 0..=100
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub assigned_at: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

impl AssessmentCard {
    /// Date used for ordering: assignment, else completion.
    pub fn sort_date(&self) -> Option<&str> {
        self.assigned_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.completed_at.as_deref().filter(|s| !s.is_empty()))
    }

    /// Whole-number progress, 0..=100. Falls back to the answered share
    /// when the backend sends no explicit value.
    pub fn progress_percent(&self) -> Option<u8> {
        let raw = match (self.progress, self.answered_items, self.total_items) {
            (Some(progress), _, _) => progress,
            (None, Some(answered), Some(total)) if total > 0 => {
                f64::from(answered) * 100.0 / f64::from(total)
            }
            _ => return None,
        };
        raw.is_finite()
            .then(|| crate::core::format::js_round(raw.clamp(0.0, 100.0)) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Type,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn toggled(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }
}
