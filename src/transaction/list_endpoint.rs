//! Defines the endpoint for listing and searching transactions for a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, month::parse_month_param, pagination::PaginationConfig};

use super::{
    core::Transaction,
    query::{TransactionQuery, get_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page defaults and limits.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the transaction listing endpoint.
///
/// All parameters are taken as raw strings so that malformed values are
/// rejected with the API's JSON error shape rather than axum's plain-text
/// query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    /// The calendar month to list transactions for, as the numbers 1-12.
    pub month: Option<String>,
    /// Text to match against the title, description, and price.
    pub search: Option<String>,
    /// The page number to return, starting at 1.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub per_page: Option<String>,
}

/// A route handler for listing the transactions of a calendar month as JSON.
///
/// Results are filtered by the optional search term and returned one page at
/// a time.
///
/// # Errors
/// Returns a 400 response if the month, page, or page size parameters are
/// missing or invalid, or a 500 response if the database cannot be read.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let month = parse_month_param(params.month.as_deref())?;
    let page_request = state
        .pagination_config
        .resolve(params.page.as_deref(), params.per_page.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(
        TransactionQuery {
            month,
            search: params.search,
            limit: Some(page_request.limit),
            offset: page_request.offset,
        },
        &connection,
    )?;

    Ok(Json(transactions))
}
