//! Database query helpers for listing and searching transactions.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Month;

use crate::Error;

use super::core::{Transaction, map_transaction_row};

/// A query for product transactions in a given month.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only return transactions whose sale date falls in this calendar month,
    /// regardless of year.
    pub month: Month,
    /// Optional text to match against the title, description, and price.
    pub search: Option<String>,
    /// The maximum number of transactions to return. `None` returns all
    /// matching transactions.
    pub limit: Option<u64>,
    /// The number of matching transactions to skip. Ignored unless a limit is
    /// set.
    pub offset: u64,
}

/// Query for transactions in the database.
///
/// The search term matches case-insensitively against the title and
/// description. A numeric search term additionally matches transactions with
/// that exact price.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is a SQL error.
pub fn get_transactions(
    filter: TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query_string_parts = vec![
        "SELECT id, title, description, price, date_of_sale, category, sold FROM transactions"
            .to_string(),
    ];
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    where_clause_parts.push(format!(
        "CAST(strftime('%m', date_of_sale) AS INTEGER) = ?{}",
        query_parameters.len() + 1
    ));
    query_parameters.push(Value::Integer(u8::from(filter.month) as i64));

    if let Some(search_term) = filter.search.as_deref().filter(|term| !term.is_empty()) {
        let like_pattern = format!("%{search_term}%");
        let mut search_clause_parts = vec![
            format!("title LIKE ?{}", query_parameters.len() + 1),
            format!("description LIKE ?{}", query_parameters.len() + 2),
        ];
        query_parameters.push(Value::Text(like_pattern.clone()));
        query_parameters.push(Value::Text(like_pattern));

        // A text term can never equal the REAL price column, so the price
        // comparison only exists for numeric search terms.
        if let Ok(price) = search_term.parse::<f64>() {
            search_clause_parts.push(format!("price = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(price));
        }

        where_clause_parts.push(format!("({})", search_clause_parts.join(" OR ")));
    }

    query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));

    // Seeded rows keep their dataset order, so sort by ID to keep pages stable.
    query_string_parts.push("ORDER BY id ASC".to_string());

    if let Some(limit) = filter.limit {
        query_string_parts.push(format!("LIMIT {limit} OFFSET {}", filter.offset));
    }

    let query_string = query_string_parts.join(" ");
    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}
