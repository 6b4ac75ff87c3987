use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Prefix every rsvp route is mounted under.
pub const BASE_PATH: &str = "/rsvp/v1";

/// Mount the guest and admin endpoints on `router`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let api = Router::new()
        // Guest side
        .route("/responses", post(handlers::submit_response))
        .route("/categories", get(handlers::get_categories))
        .route("/venue", get(handlers::list_venues))
        .route("/venue/map", get(handlers::open_map))
        // Admin side, gated by AdminGuard inside each handler
        .route("/admin/login", post(handlers::admin_login))
        .route("/admin/responses", get(handlers::list_responses))
        .route(
            "/admin/responses/{id}",
            get(handlers::get_response).delete(handlers::delete_response),
        )
        .route("/admin/report", get(handlers::get_report))
        .route("/admin/report.pdf", get(handlers::export_report))
        .layer(Extension(service));

    router.nest(BASE_PATH, api)
}
