//! Shared UI crate for the Kaizen dashboard: formatting utilities, view
//! models, reactive stores and the Dioxus components that render them.

pub mod assessments;
pub mod calendar;
pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod insights;
pub mod stores;
