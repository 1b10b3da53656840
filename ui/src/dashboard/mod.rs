//! Dioxus views for the dashboard cards.
//!
//! Every component takes rows that the host already fetched and renders
//! them through the pure helpers in [`crate::calendar`],
//! [`crate::assessments`] and [`crate::insights`]. Mount [`DashboardStyles`]
//! once near the root so the `dashboard-*` classes resolve.

mod assessments;
mod calendar;
mod insights;
mod notebook;

pub use assessments::AssessmentList;
pub use calendar::CalendarHeatmap;
pub use insights::InsightsPanel;
pub use notebook::NotebookBadge;

use dioxus::prelude::*;

pub const DASHBOARD_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/dashboard.css"
));

#[component]
pub fn DashboardStyles() -> Element {
    rsx! {
        document::Style { "{DASHBOARD_CSS}" }
    }
}
