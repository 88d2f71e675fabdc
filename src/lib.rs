//! Salestats is a small web service that mirrors a public product transaction
//! dataset into SQLite and serves paginated listings and monthly sales
//! statistics over a JSON REST API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod chart;
mod combined;
mod db;
mod endpoints;
mod month;
mod pagination;
mod routing;
mod seed;
mod statistics;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, SeedTransaction, ensure_seed_data, fetch_seed_transactions};
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionQuery, create_transaction,
    get_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not include the mandatory `month` query parameter.
    #[error("the \"month\" query parameter is required")]
    MissingMonth,

    /// The `month` query parameter could not be parsed as a calendar month.
    ///
    /// Callers should pass in the raw parameter value so the client can see
    /// what was rejected.
    #[error("\"{0}\" is not a valid month, expected a number between 1 and 12")]
    InvalidMonth(String),

    /// The `page` query parameter was not a valid page number.
    #[error("\"{0}\" is not a valid page number, page numbers start at 1")]
    InvalidPage(String),

    /// The `perPage` query parameter was not a valid page size.
    #[error("\"{given}\" is not a valid page size, expected a number between 1 and {max}")]
    InvalidPageSize {
        /// The page size the client asked for.
        given: String,
        /// The largest page size the server will produce.
        max: u64,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the request
    /// path is correct.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background task running a database query was cancelled or panicked
    /// before it produced a result.
    #[error("a background query task failed: {0}")]
    QueryTaskError(String),

    /// The seed dataset could not be downloaded or parsed.
    ///
    /// The reason is kept as a string because the underlying HTTP errors are
    /// not comparable.
    #[error("could not fetch seed data from {url}: {reason}")]
    SeedFetchError {
        /// The URL the seed data was requested from.
        url: String,
        /// A human-readable description of what went wrong.
        reason: String,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body returned for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::MissingMonth
            | Error::InvalidMonth(_)
            | Error::InvalidPage(_)
            | Error::InvalidPageSize { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            // Unexpected errors are logged, and the JSON body still carries
            // their message.
            ref error => {
                tracing::error!("An unexpected error occurred: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status_code, Json(body)).into_response()
    }
}
