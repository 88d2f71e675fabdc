//! Defines the endpoint for the price-range histogram of a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Month;

use crate::{AppState, Error, month::parse_month_param};

use super::buckets::{PriceBucket, bucket_price_counts};

/// The state needed to build the bar chart.
#[derive(Debug, Clone)]
pub struct BarChartState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BarChartState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the bar chart endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BarChartParams {
    /// The calendar month to chart, as the numbers 1-12.
    pub month: Option<String>,
}

/// Count the transactions of `month` grouped by their exact price.
///
/// The price buckets are computed in Rust rather than SQL, so this query only
/// collapses duplicate prices to keep the row count small.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - a row cannot be mapped to a price and count
pub fn count_transactions_by_price(
    month: Month,
    connection: &Connection,
) -> Result<Vec<(f64, u32)>, Error> {
    let month_number = u8::from(month) as i64;

    connection
        .prepare(
            "SELECT price, COUNT(*) AS count
             FROM transactions
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month
             GROUP BY price
             ORDER BY price ASC",
        )?
        .query_map(&[(":month", &month_number)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .map(|maybe_price_count| maybe_price_count.map_err(Error::SqlError))
        .collect()
}

/// A route handler for the price-range histogram of a calendar month as JSON.
///
/// The response always holds the same ten price ranges, including empty ones.
///
/// # Errors
/// Returns a 400 response if the month parameter is missing or invalid, or a
/// 500 response if the database cannot be read.
pub async fn bar_chart_endpoint(
    State(state): State<BarChartState>,
    Query(params): Query<BarChartParams>,
) -> Result<Json<Vec<PriceBucket>>, Error> {
    let month = parse_month_param(params.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let price_counts = count_transactions_by_price(month, &connection)?;

    Ok(Json(bucket_price_counts(&price_counts)))
}

#[cfg(test)]
mod bar_chart_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Date, Month, macros::date};

    use crate::{
        AppState, build_router, chart::PriceBucket, db::initialize, endpoints,
        pagination::PaginationConfig,
        transaction::{NewTransaction, create_transaction},
    };

    use super::count_transactions_by_price;

    fn insert_sample(conn: &Connection, price: f64, date_of_sale: Date) {
        create_transaction(
            NewTransaction {
                title: "Product".to_owned(),
                description: String::new(),
                price,
                date_of_sale,
                category: "electronics".to_owned(),
                sold: true,
            },
            conn,
        )
        .expect("Could not create transaction");
    }

    #[test]
    fn groups_duplicate_prices() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        insert_sample(&conn, 50.0, date!(2022 - 03 - 01));
        insert_sample(&conn, 50.0, date!(2021 - 03 - 11));
        insert_sample(&conn, 150.0, date!(2022 - 03 - 15));
        insert_sample(&conn, 150.0, date!(2022 - 04 - 15));
        let want = vec![(50.0, 2), (150.0, 1)];

        let got = count_transactions_by_price(Month::March, &conn)
            .expect("Could not count transactions by price");

        assert_eq!(want, got);
    }

    fn get_test_state_and_server() -> (AppState, TestServer) {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, PaginationConfig::default())
            .expect("Could not create app state.");
        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        (state, server)
    }

    fn bucket(range: &str, count: u32) -> PriceBucket {
        PriceBucket {
            range: range.to_owned(),
            count,
        }
    }

    #[tokio::test]
    async fn returns_all_buckets_for_month() {
        let (state, server) = get_test_state_and_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_sample(&connection, 50.0, date!(2022 - 03 - 01));
            insert_sample(&connection, 150.0, date!(2022 - 03 - 15));
        }
        let want = vec![
            bucket("0-100", 1),
            bucket("100-200", 1),
            bucket("200-300", 0),
            bucket("300-400", 0),
            bucket("400-500", 0),
            bucket("500-600", 0),
            bucket("600-700", 0),
            bucket("700-800", 0),
            bucket("800-900", 0),
            bucket("900+", 0),
        ];

        let response = server
            .get(&format!("{}?month=03", endpoints::BAR_CHART))
            .await;

        response.assert_status_ok();
        assert_eq!(want, response.json::<Vec<PriceBucket>>());
    }

    #[tokio::test]
    async fn returns_empty_buckets_for_month_without_transactions() {
        let (_state, server) = get_test_state_and_server();

        let response = server
            .get(&format!("{}?month=7", endpoints::BAR_CHART))
            .await;

        response.assert_status_ok();
        let buckets = response.json::<Vec<PriceBucket>>();
        assert_eq!(10, buckets.len());
        assert!(buckets.iter().all(|bucket| bucket.count == 0));
    }

    #[tokio::test]
    async fn missing_month_returns_bad_request() {
        let (_state, server) = get_test_state_and_server();

        let response = server.get(endpoints::BAR_CHART).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
