//! Defines the endpoint for the per-category counts of a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{AppState, Error, month::parse_month_param};

/// One product category and the number of transactions in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The product category, e.g. "electronics".
    pub category: String,
    /// The number of transactions in the category.
    pub count: u32,
}

/// The state needed to build the pie chart.
#[derive(Debug, Clone)]
pub struct PieChartState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PieChartState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the pie chart endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PieChartParams {
    /// The calendar month to chart, as the numbers 1-12.
    pub month: Option<String>,
}

/// Count the transactions of `month` grouped by category.
///
/// Categories are returned in alphabetical order. Categories with no
/// transactions in the month are not listed.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - a row cannot be mapped to a [CategoryCount]
pub fn count_transactions_by_category(
    month: Month,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let month_number = u8::from(month) as i64;

    connection
        .prepare(
            "SELECT category, COUNT(*) AS count
             FROM transactions
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month
             GROUP BY category
             ORDER BY category ASC",
        )?
        .query_map(&[(":month", &month_number)], |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|maybe_category_count| maybe_category_count.map_err(Error::SqlError))
        .collect()
}

/// A route handler for the per-category counts of a calendar month as JSON.
///
/// # Errors
/// Returns a 400 response if the month parameter is missing or invalid, or a
/// 500 response if the database cannot be read.
pub async fn pie_chart_endpoint(
    State(state): State<PieChartState>,
    Query(params): Query<PieChartParams>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let month = parse_month_param(params.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category_counts = count_transactions_by_category(month, &connection)?;

    Ok(Json(category_counts))
}

#[cfg(test)]
mod pie_chart_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Date, Month, macros::date};

    use crate::{
        AppState, build_router, db::initialize, endpoints, pagination::PaginationConfig,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{CategoryCount, count_transactions_by_category};

    fn insert_sample(conn: &Connection, category: &str, date_of_sale: Date) {
        create_transaction(
            NewTransaction {
                title: "Product".to_owned(),
                description: String::new(),
                price: 10.0,
                date_of_sale,
                category: category.to_owned(),
                sold: true,
            },
            conn,
        )
        .expect("Could not create transaction");
    }

    fn category_count(category: &str, count: u32) -> CategoryCount {
        CategoryCount {
            category: category.to_owned(),
            count,
        }
    }

    #[test]
    fn counts_categories_in_alphabetical_order() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        insert_sample(&conn, "jewelry", date!(2022 - 03 - 01));
        insert_sample(&conn, "electronics", date!(2022 - 03 - 11));
        insert_sample(&conn, "electronics", date!(2021 - 03 - 21));
        insert_sample(&conn, "electronics", date!(2022 - 06 - 21));
        let want = vec![
            category_count("electronics", 2),
            category_count("jewelry", 1),
        ];

        let got = count_transactions_by_category(Month::March, &conn)
            .expect("Could not count transactions by category");

        assert_eq!(want, got);
    }

    #[test]
    fn returns_no_categories_for_empty_month() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        insert_sample(&conn, "electronics", date!(2022 - 06 - 21));

        let got = count_transactions_by_category(Month::March, &conn)
            .expect("Could not count transactions by category");

        assert_eq!(Vec::<CategoryCount>::new(), got);
    }

    fn get_test_state_and_server() -> (AppState, TestServer) {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, PaginationConfig::default())
            .expect("Could not create app state.");
        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        (state, server)
    }

    #[tokio::test]
    async fn returns_category_counts_for_month() {
        let (state, server) = get_test_state_and_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_sample(&connection, "jewelry", date!(2022 - 03 - 01));
            insert_sample(&connection, "electronics", date!(2022 - 03 - 11));
        }
        let want = vec![
            category_count("electronics", 1),
            category_count("jewelry", 1),
        ];

        let response = server
            .get(&format!("{}?month=3", endpoints::PIE_CHART))
            .await;

        response.assert_status_ok();
        assert_eq!(want, response.json::<Vec<CategoryCount>>());
    }

    #[tokio::test]
    async fn missing_month_returns_bad_request() {
        let (_state, server) = get_test_state_and_server();

        let response = server.get(endpoints::PIE_CHART).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
