use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.allow_origins);

    Router::new()
        .route(
            "/",
            get(routes::status::status)
                .post(routes::analyze::analyze)
                .options(routes::preflight)
                .fallback(routes::method_not_allowed),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // A panic anywhere in a handler still produces an HTTP response
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Wildcard when no origins are configured; otherwise an allow-list
/// reflected back per request.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
