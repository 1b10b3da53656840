use std::collections::BTreeMap;

use tracing::debug;

use super::{CalendarDay, CalendarStat, DAYS_PER_WEEK, WEEKS};
use crate::core::datetime::calendar_date;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Seven days, Sunday first.
pub type Week = [CalendarDay; DAYS_PER_WEEK];

/// Always exactly [`WEEKS`] columns of [`DAYS_PER_WEEK`] cells, oldest week first.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    weeks: Vec<Week>,
}

impl CalendarGrid {
    pub fn empty() -> Self {
        Self {
            weeks: (0..WEEKS).map(|_| blank_week()).collect(),
        }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.iter())
    }
}

fn blank_week() -> Week {
    std::array::from_fn(|_| CalendarDay::dummy())
}

/// Lay `rows` out on the trailing 52 weeks ending at the highest
/// `week_index`. Missing days become dummies; rows with `dow` outside 0..=6
/// are dropped. When two rows share a slot the later one wins.
pub fn build_calendar_grid_fixed(rows: &[CalendarStat]) -> CalendarGrid {
    let mut by_week: BTreeMap<i64, Vec<&CalendarStat>> = BTreeMap::new();
    for row in rows {
        by_week.entry(row.week_index).or_default().push(row);
    }

    let Some(&max_week) = by_week.keys().next_back() else {
        return CalendarGrid::empty();
    };
    let min_week = max_week.saturating_sub(WEEKS as i64 - 1);
    // Near i64::MIN the window is short; pad the oldest columns.
    let missing = WEEKS - usize::try_from(max_week.abs_diff(min_week) + 1).unwrap_or(WEEKS);

    let weeks = std::iter::repeat_with(blank_week)
        .take(missing)
        .chain((min_week..=max_week)
        .map(|week_index| {
            let mut week = blank_week();
            for row in by_week.get(&week_index).into_iter().flatten() {
                match usize::try_from(row.dow).ok().filter(|dow| *dow < DAYS_PER_WEEK) {
                    Some(dow) => week[dow] = CalendarDay::from(*row),
                    None => debug!(
                        target: "kaizen::calendar",
                        stat_date = %row.stat_date,
                        dow = row.dow,
                        "dropping row with out-of-range day of week"
                    ),
                }
            }
            week
        }))
        .collect();

    CalendarGrid { weeks }
}

/// One label per column: the short month name of the column's first real
/// day, emitted only when it differs from the previous labelled month.
pub fn build_month_labels(grid: &CalendarGrid) -> Vec<String> {
    let mut last_month = None;

    grid.weeks()
        .iter()
        .map(|week| {
            let month = week
                .iter()
                .find_map(|day| day.stat_date.as_deref().filter(|d| !d.is_empty()))
                .and_then(calendar_date)
                .map(|date| date.month());

            match month {
                Some(month) if Some(month) != last_month => {
                    last_month = Some(month);
                    MONTHS[usize::from(u8::from(month)) - 1].to_string()
                }
                _ => String::new(),
            }
        })
        .collect()
}

/// Heatmap fill for a 0..=1 accuracy; grey when missing.
pub fn calendar_day_color(accuracy: Option<f64>) -> &'static str {
    match accuracy {
        None => "#aaaaaa",
        Some(acc) if acc.is_nan() => "#aaaaaa",
        Some(acc) if acc < 0.3 => "#d00000",
        Some(acc) if acc < 0.5 => "#e36414",
        Some(acc) if acc < 0.75 => "#fb8b24",
        Some(acc) if acc < 0.8 => "#98c1d9",
        Some(acc) if acc < 0.85 => "#4b8a6f",
        Some(_) => "#07f6c3",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(date: &str, week_index: i64, dow: i64, accuracy: f64) -> CalendarStat {
        CalendarStat {
            stat_date: date.to_string(),
            dow,
            week_index,
            answered: Some(10),
            correct: Some((accuracy * 10.0) as u32),
            accuracy: Some(accuracy),
            avg_rt_ms: Some(4200.0),
        }
    }

    #[test]
    fn empty_input_still_yields_full_grid() {
        let grid = build_calendar_grid_fixed(&[]);
        assert_eq!(grid.weeks().len(), WEEKS);
        assert!(grid.days().all(|d| d.is_dummy));
        assert!(build_month_labels(&grid).iter().all(String::is_empty));
    }

    #[test]
    fn places_rows_by_week_and_dow() {
        let rows = vec![
            stat("2025-03-02", 100, 0, 0.9),
            stat("2025-03-05", 100, 3, 0.4),
            stat("2024-03-03", 48, 0, 0.7),
        ];
        let grid = build_calendar_grid_fixed(&rows);

        assert_eq!(grid.weeks().len(), WEEKS);
        let last = &grid.weeks()[WEEKS - 1];
        assert_eq!(last[0].stat_date.as_deref(), Some("2025-03-02"));
        assert_eq!(last[3].accuracy, Some(0.4));
        assert!(last[1].is_dummy);
        // Week 48 falls outside the 52-week window ending at 100.
        assert_eq!(grid.days().filter(|d| !d.is_dummy).count(), 2);
    }

    #[test]
    fn out_of_range_dow_is_dropped() {
        let rows = vec![stat("2025-03-02", 3, 7, 0.9), stat("2025-03-01", 3, -1, 0.9)];
        let grid = build_calendar_grid_fixed(&rows);
        assert_eq!(grid.weeks().len(), WEEKS);
        assert!(grid.days().all(|d| d.is_dummy));
    }

    #[test]
    fn extreme_week_indices_keep_the_grid_full() {
        let low = build_calendar_grid_fixed(&[stat("2025-03-02", i64::MIN, 2, 0.9)]);
        assert_eq!(low.weeks().len(), WEEKS);
        assert!(!low.weeks()[WEEKS - 1][2].is_dummy);

        let high = build_calendar_grid_fixed(&[stat("2025-03-02", i64::MAX, 0, 0.9)]);
        assert_eq!(high.weeks().len(), WEEKS);
        assert!(!high.weeks()[WEEKS - 1][0].is_dummy);
    }

    #[test]
    fn month_labels_only_on_change() {
        let rows = vec![
            stat("2025-01-26", 49, 0, 0.5),
            stat("2025-02-02", 50, 0, 0.5),
            stat("2025-02-09", 51, 0, 0.5),
            stat("2025-03-02", 52, 0, 0.5),
        ];
        let labels = build_month_labels(&build_calendar_grid_fixed(&rows));
        assert_eq!(labels.len(), WEEKS);
        assert_eq!(&labels[WEEKS - 4..], ["Jan", "Feb", "", "Mar"]);
        assert!(labels[..WEEKS - 4].iter().all(String::is_empty));
    }

    #[test]
    fn color_bands() {
        assert_eq!(calendar_day_color(None), "#aaaaaa");
        assert_eq!(calendar_day_color(Some(f64::NAN)), "#aaaaaa");
        assert_eq!(calendar_day_color(Some(0.1)), "#d00000");
        assert_eq!(calendar_day_color(Some(0.45)), "#e36414");
        assert_eq!(calendar_day_color(Some(0.6)), "#fb8b24");
        assert_eq!(calendar_day_color(Some(0.78)), "#98c1d9");
        assert_eq!(calendar_day_color(Some(0.82)), "#4b8a6f");
        assert_eq!(calendar_day_color(Some(0.95)), "#07f6c3");
    }
}
