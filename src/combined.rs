//! Defines the endpoint that combines the month's listing, statistics, and
//! charts into a single response.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    chart::{
        CategoryCount, PriceBucket, bucket_price_counts, count_transactions_by_category,
        count_transactions_by_price,
    },
    month::parse_month_param,
    statistics::{MonthlyStatistics, get_monthly_statistics},
    transaction::{Transaction, TransactionQuery, get_transactions},
};

/// The state needed to build the combined report.
#[derive(Debug, Clone)]
pub struct CombinedReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CombinedReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the combined report endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CombinedReportParams {
    /// The calendar month to report on, as the numbers 1-12.
    pub month: Option<String>,
}

/// The month's transactions, totals, and chart data in one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Every transaction of the month, without pagination.
    pub transactions: Vec<Transaction>,
    /// The sales totals of the month.
    pub stats: MonthlyStatistics,
    /// The price-range histogram of the month.
    pub bar_chart: Vec<PriceBucket>,
    /// The per-category counts of the month.
    pub pie_chart: Vec<CategoryCount>,
}

/// A route handler that serves the month's transactions, statistics, and both
/// charts in a single JSON response.
///
/// The four queries are run as a structured concurrent join over the shared
/// database connection, and the first error to occur fails the whole request.
///
/// # Errors
/// Returns a 400 response if the month parameter is missing or invalid, or a
/// 500 response if any of the queries fail.
pub async fn combined_report_endpoint(
    State(state): State<CombinedReportState>,
    Query(params): Query<CombinedReportParams>,
) -> Result<Json<CombinedReport>, Error> {
    let month = parse_month_param(params.month.as_deref())?;

    let (transactions, stats, bar_chart, pie_chart) = tokio::try_join!(
        run_query(&state.db_connection, move |connection| {
            get_transactions(
                TransactionQuery {
                    month,
                    search: None,
                    limit: None,
                    offset: 0,
                },
                connection,
            )
        }),
        run_query(&state.db_connection, move |connection| {
            get_monthly_statistics(month, connection)
        }),
        run_query(&state.db_connection, move |connection| {
            let price_counts = count_transactions_by_price(month, connection)?;
            Ok(bucket_price_counts(&price_counts))
        }),
        run_query(&state.db_connection, move |connection| {
            count_transactions_by_category(month, connection)
        }),
    )?;

    Ok(Json(CombinedReport {
        transactions,
        stats,
        bar_chart,
        pie_chart,
    }))
}

/// Run `query` against the database on a blocking worker thread.
///
/// SQLite queries are synchronous, so each one is moved onto a worker thread
/// via [tokio::task::spawn_blocking] to keep the async runtime free while the
/// combined report's queries wait on the connection lock.
async fn run_query<T, F>(db_connection: &Arc<Mutex<Connection>>, query: F) -> Result<T, Error>
where
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let db_connection = Arc::clone(db_connection);

    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await
    .map_err(|error| Error::QueryTaskError(error.to_string()))?
}
