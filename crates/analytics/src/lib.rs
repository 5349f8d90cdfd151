//! Aggregation and view-model building for the discount dashboard.
//!
//! - `aggregate`: filter + group-by + sum over the product table
//! - `view_model`: totals and chart series derived from an aggregation
//! - `format`: number formatting for KPI cards and chart labels
//! - `dashboard`: request/response facade consumed by the HTTP layer

pub mod aggregate;
pub mod dashboard;
pub mod format;
pub mod view_model;

pub use aggregate::{aggregate, AggregateQuery, AggregateRow, Aggregation, Filters, ScopeTotals};
pub use dashboard::{Dashboard, Selection, DEFAULT_BRAND_TOP_N};
pub use view_model::{Amount, ChartValue, Series, ViewModel, ViewModelBuilder, DEFAULT_CURRENCY_SUFFIX};
