//! REST API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{admin, portal, submissions};
use crate::web::state::WebAppState;

/// Build the API router with all REST endpoints.
pub fn api_routes() -> Router<WebAppState> {
    Router::new()
        .route("/form", get(portal::get_form_info))
        .route("/submissions", post(submissions::create_submission))
        // Admin routes, hidden unless ?admin=true
        .route("/admin/submissions", get(admin::list_submissions))
        .route(
            "/admin/submissions/delete",
            post(admin::delete_submissions),
        )
        .route(
            "/admin/submissions.csv",
            get(admin::download_submissions),
        )
}
