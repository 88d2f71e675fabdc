//! Monthly sales statistics.
//!
//! This module contains the [MonthlyStatistics] model, the query that
//! computes it, and the endpoint that serves it as JSON.

mod core;
mod endpoint;

pub use core::{MonthlyStatistics, get_monthly_statistics};
pub use endpoint::{StatisticsState, statistics_endpoint};
