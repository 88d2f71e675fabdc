//! Application router configuration for the JSON API.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, Error,
    chart::{bar_chart_endpoint, pie_chart_endpoint},
    combined::combined_report_endpoint,
    endpoints,
    statistics::statistics_endpoint,
    transaction::list_transactions_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(statistics_endpoint))
        .route(endpoints::BAR_CHART, get(bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(pie_chart_endpoint))
        .route(endpoints::COMBINED, get(combined_report_endpoint))
        .fallback(get_not_found)
        .with_state(state)
}

/// Requests for unknown paths get the same JSON error shape as the API routes.
async fn get_not_found() -> Response {
    Error::NotFound.into_response()
}
