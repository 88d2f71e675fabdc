//! Defines the monthly sales statistics model and its database query.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::Error;

/// The sales totals for one calendar month across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistics {
    /// The summed price of every transaction in the month, sold or not.
    pub total_sales: f64,
    /// The number of items that sold.
    pub sold_items: u32,
    /// The number of items that did not sell.
    pub not_sold_items: u32,
}

/// Get the sales totals for `month`.
///
/// The total sale amount sums the price of every transaction in the month,
/// whether or not the item sold, matching the upstream dataset's reporting.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - the row cannot be mapped to [MonthlyStatistics]
pub fn get_monthly_statistics(
    month: Month,
    connection: &Connection,
) -> Result<MonthlyStatistics, Error> {
    let month_number = u8::from(month) as i64;

    let statistics = connection
        .prepare(
            "SELECT
                COALESCE(SUM(price), 0) AS total_sales,
                COUNT(CASE WHEN sold = 1 THEN 1 END) AS sold_items,
                COUNT(CASE WHEN sold = 0 THEN 1 END) AS not_sold_items
             FROM transactions
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month",
        )?
        .query_one(&[(":month", &month_number)], |row| {
            Ok(MonthlyStatistics {
                total_sales: row.get(0)?,
                sold_items: row.get(1)?,
                not_sold_items: row.get(2)?,
            })
        })?;

    Ok(statistics)
}
