//! Defines the endpoint for the sales totals of a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, month::parse_month_param};

use super::core::{MonthlyStatistics, get_monthly_statistics};

/// The state needed to compute monthly statistics.
#[derive(Debug, Clone)]
pub struct StatisticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatisticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the statistics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsParams {
    /// The calendar month to compute totals for, as the numbers 1-12.
    pub month: Option<String>,
}

/// A route handler for the sales totals of a calendar month as JSON.
///
/// # Errors
/// Returns a 400 response if the month parameter is missing or invalid, or a
/// 500 response if the database cannot be read.
pub async fn statistics_endpoint(
    State(state): State<StatisticsState>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<MonthlyStatistics>, Error> {
    let month = parse_month_param(params.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let statistics = get_monthly_statistics(month, &connection)?;

    Ok(Json(statistics))
}
