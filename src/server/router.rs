//! Route table for the edtoys API

use crate::server::handlers::{
    AppState, create_edtoy, delete_edtoy, healthcheck, list_edtoys, method_not_allowed,
    not_found, show_edtoy, update_edtoy,
};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Build the API routes
///
/// - GET /v1/healthcheck - Service status
/// - GET /v1/edtoys - Search and paginate records
/// - POST /v1/edtoys - Create a record
/// - GET /v1/edtoys/{id} - Fetch a record
/// - PATCH /v1/edtoys/{id} - Partially update a record
/// - DELETE /v1/edtoys/{id} - Delete a record
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/healthcheck", get(healthcheck))
        .route("/v1/edtoys", get(list_edtoys).post(create_edtoy))
        .route(
            "/v1/edtoys/{id}",
            get(show_edtoy).patch(update_edtoy).delete(delete_edtoy),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
