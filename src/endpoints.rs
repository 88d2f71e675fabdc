//! The API endpoint URIs.

/// The route for listing and searching the transactions of a month.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price-range histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the per-category counts of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route that combines the other endpoints into a single response.
pub const COMBINED: &str = "/combined";
