use std::cmp::Ordering;
use std::collections::HashSet;

use super::{AssessmentCard, AssessmentType, SortDir, SortKey};
use crate::core::datetime;

/// Stable sort on a copy of `list`.
///
/// Missing scores and missing or unparsable dates rank below every real
/// value, so they come first ascending and last descending.
pub fn sort_assessments(list: &[AssessmentCard], key: SortKey, dir: SortDir) -> Vec<AssessmentCard> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => date_millis(a).cmp(&date_millis(b)),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Type => a.kind.as_str().cmp(b.kind.as_str()),
            SortKey::Score => cmp_score(a.score, b.score),
        };
        dir.apply(ordering)
    });
    sorted
}

fn date_millis(card: &AssessmentCard) -> Option<i128> {
    card.sort_date()
        .and_then(|text| datetime::parse(text).unix_millis())
}

fn cmp_score(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    a.total_cmp(&b)
}

/// Cards whose type is in `types`, input order kept.
pub fn filter_by_type(list: &[AssessmentCard], types: &HashSet<AssessmentType>) -> Vec<AssessmentCard> {
    list.iter()
        .filter(|card| types.contains(&card.kind))
        .cloned()
        .collect()
}

/// Display band for a 0..=100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryBand {
    Unknown,
    Low,
    Fair,
    Good,
    High,
    Excellent,
}

impl MasteryBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => MasteryBand::Unknown,
            Some(s) if s.is_nan() => MasteryBand::Unknown,
            Some(s) if s >= 90.0 => MasteryBand::Excellent,
            Some(s) if s >= 75.0 => MasteryBand::High,
            Some(s) if s >= 60.0 => MasteryBand::Good,
            Some(s) if s >= 40.0 => MasteryBand::Fair,
            Some(_) => MasteryBand::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MasteryBand::Unknown => "Not scored",
            MasteryBand::Excellent => "Excellent",
            MasteryBand::High => "High",
            MasteryBand::Good => "Good",
            MasteryBand::Fair => "Fair",
            MasteryBand::Low => "Low",
        }
    }

    /// CSS colour with a theme-variable override.
    pub fn color(self) -> &'static str {
        match self {
            MasteryBand::Unknown => "var(--grey-light)",
            MasteryBand::Excellent => "var(--kaizen-mastery-excellent, #2ecc40)",
            MasteryBand::High => "var(--kaizen-mastery-high, #00bfae)",
            MasteryBand::Good => "var(--kaizen-mastery-good, #ffd600)",
            MasteryBand::Fair => "var(--kaizen-mastery-fair, #ff9800)",
            MasteryBand::Low => "var(--kaizen-mastery-low, #e74c3c)",
        }
    }
}

pub fn mastery_color(score: Option<f64>) -> &'static str {
    MasteryBand::from_score(score).color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessments::AssessmentStatus;

    fn card(id: &str, title: &str, kind: AssessmentType, score: Option<f64>, date: Option<&str>) -> AssessmentCard {
        AssessmentCard {
            instance_id: id.into(),
            title: title.into(),
            description: None,
            kind,
            status: AssessmentStatus::Assigned,
            score,
            raw_score: None,
            total_items: None,
            answered_items: None,
            progress: None,
            assigned_at: date.map(str::to_string),
            last_activity_at: None,
            completed_at: None,
            duration_seconds: None,
            parent_id: None,
            settings: None,
        }
    }

    fn ids(list: &[AssessmentCard]) -> Vec<&str> {
        list.iter().map(|c| c.instance_id.as_str()).collect()
    }

    fn sample() -> Vec<AssessmentCard> {
        vec![
            card("a", "beta", AssessmentType::MockExam, Some(70.0), Some("2025-03-02T10:00:00Z")),
            card("b", "Alpha", AssessmentType::Prompt, None, Some("2025-01-15")),
            card("c", "gamma", AssessmentType::ShortQuiz, Some(95.0), None),
            card("d", "alpha", AssessmentType::LongQuiz, Some(70.0), Some("2025-02-10 08:00:00.123456+00")),
        ]
    }

    #[test]
    fn score_desc_puts_missing_last_and_is_stable() {
        let sorted = sort_assessments(&sample(), SortKey::Score, SortDir::Desc);
        assert_eq!(ids(&sorted), ["c", "a", "d", "b"]);
        let sorted = sort_assessments(&sample(), SortKey::Score, SortDir::Asc);
        assert_eq!(ids(&sorted), ["b", "a", "d", "c"]);
    }

    #[test]
    fn date_sort_handles_mixed_formats_and_missing() {
        let sorted = sort_assessments(&sample(), SortKey::Date, SortDir::Asc);
        assert_eq!(ids(&sorted), ["c", "b", "d", "a"]);
        let sorted = sort_assessments(&sample(), SortKey::Date, SortDir::Desc);
        assert_eq!(ids(&sorted), ["a", "d", "b", "c"]);
    }

    #[test]
    fn date_falls_back_to_completion() {
        let mut list = sample();
        list[2].completed_at = Some("2025-04-01".into());
        let sorted = sort_assessments(&list, SortKey::Date, SortDir::Desc);
        assert_eq!(ids(&sorted), ["c", "a", "d", "b"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let sorted = sort_assessments(&sample(), SortKey::Title, SortDir::Asc);
        assert_eq!(ids(&sorted), ["b", "d", "a", "c"]);
    }

    #[test]
    fn type_sort_uses_wire_names() {
        let sorted = sort_assessments(&sample(), SortKey::Type, SortDir::Asc);
        assert_eq!(ids(&sorted), ["d", "a", "b", "c"]);
    }

    #[test]
    fn filter_keeps_only_selected_types() {
        let wanted = HashSet::from([AssessmentType::Prompt, AssessmentType::MockExam]);
        assert_eq!(ids(&filter_by_type(&sample(), &wanted)), ["a", "b"]);
        assert!(filter_by_type(&sample(), &HashSet::new()).is_empty());
    }

    #[test]
    fn mastery_bands() {
        assert_eq!(mastery_color(Some(92.0)), "var(--kaizen-mastery-excellent, #2ecc40)");
        assert_eq!(mastery_color(None), "var(--grey-light)");
        assert_eq!(mastery_color(Some(75.0)), "var(--kaizen-mastery-high, #00bfae)");
        assert_eq!(mastery_color(Some(60.0)), "var(--kaizen-mastery-good, #ffd600)");
        assert_eq!(mastery_color(Some(40.0)), "var(--kaizen-mastery-fair, #ff9800)");
        assert_eq!(mastery_color(Some(12.0)), "var(--kaizen-mastery-low, #e74c3c)");
    }
}
