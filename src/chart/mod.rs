//! Chart data for the sales dashboard.
//!
//! This module contains the endpoints that aggregate a month's transactions
//! into chart-ready JSON: a histogram over fixed price ranges and per-category
//! counts.

mod bar_chart;
mod buckets;
mod pie_chart;

pub use bar_chart::{BarChartState, bar_chart_endpoint, count_transactions_by_price};
pub use buckets::{PriceBucket, bucket_price_counts};
pub use pie_chart::{
    CategoryCount, PieChartState, count_transactions_by_category, pie_chart_endpoint,
};
