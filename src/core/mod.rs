pub mod aggregate;
pub mod dashboard;

pub use aggregate::{aggregate_by_field, aggregate_yearly, SortOrder};
pub use dashboard::DashboardEngine;
