//! Strength/weakness analysis over the backend's aggregated summary rows.
//!
//! Rows arrive already aggregated (attempts, accuracy, Wilson lower bound,
//! response-time medians) per curriculum or assessment dimension. This module
//! only classifies and ranks them; [`present`] turns the result into display
//! strings.

mod compute;
mod model;
pub mod present;

pub use compute::{by_metric, compute_insights, compute_insights_from_json, get_overall_kpi};
pub use model::{
    parse_summary_rows, InsightConfig, Insights, Kpi, MetricKey, RankedItem, SummaryPayload,
    SummaryRow,
};
pub use present::{
    band_from_lb, to_advice_pills, to_kpi_badges, to_table_rows, AdvicePill, AdviceTone, KpiBadge,
    LbBand, TableRow, ToTableRow,
};
