//! Dashboard router.
//!
//! Returns a composable `Router` serving the HTML views at the root and the
//! JSON API under `/api/`. JSON responses carry `Cache-Control: no-store`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Access logger → 2. Body limit → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Largest accepted request body (playbook PDFs and transcripts).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the dashboard router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn dashboard_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/playbooks", get(endpoints::playbooks::list))
        .route("/playbooks/:id", delete(endpoints::playbooks::delete))
        .route(
            "/analysis",
            get(endpoints::analysis::current).post(endpoints::analysis::create),
        )
        .route("/analysis/chart.svg", get(endpoints::analysis::chart_svg))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let pages = Router::new()
        .route("/", get(endpoints::dashboard::index))
        .route(
            "/playbooks",
            get(endpoints::playbooks::page).post(endpoints::playbooks::upload),
        )
        .route(
            "/playbooks/:id/delete",
            post(endpoints::playbooks::delete_form),
        )
        .route(
            "/analyze",
            get(endpoints::dashboard::analyze_page).post(endpoints::dashboard::submit_analysis),
        )
        .route("/transcript", post(endpoints::transcript::upload));

    Router::new()
        .merge(pages)
        .nest("/api", api)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}
