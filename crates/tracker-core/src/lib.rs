//! Core types and calculations for Morning Light.
//!
//! This crate holds everything that does not need I/O:
//!
//! - [`WeightRecord`], [`UserSettings`], [`PushSubscription`] - the stored rows
//! - [`PageCursor`] / [`WeightPage`] - keyset pagination over weight history
//! - [`weights_to_csv`] - spreadsheet-safe CSV export
//! - [`calculate_bmi`], [`bmi_category`], [`summarize`] - dashboard figures
//!
//! Enable the `sqlx` feature to derive `sqlx::FromRow` on the row types.
//!
//! # Example
//!
//! ```rust
//! use tracker_core::{bmi_category, calculate_bmi, BmiCategory};
//!
//! let bmi = calculate_bmi(70.0, 175.0);
//! assert_eq!(bmi_category(bmi), BmiCategory::Healthy);
//! ```

pub mod csv;
pub mod health;
pub mod models;
pub mod page;

pub use csv::{escape_csv_value, export_csv, weights_to_csv, CSV_CONTENT_TYPE, EXPORT_FILENAME};
pub use health::{
    bmi_category, calculate_bmi, chart_window, mascot_mood, summarize, BmiCategory, ChartRange,
    DashboardSummary, Mood, ParseChartRangeError,
};
pub use models::{NewWeight, PushSubscription, UserSettings, WeightRecord, DEFAULT_REMINDER_HOUR};
pub use page::{clamp_limit, PageCursor, WeightPage, MAX_PAGE_SIZE, PAGE_SIZE};
