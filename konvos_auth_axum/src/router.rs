//! Routers for the register/login endpoints and the whole backend

use axum::{Router, routing::get};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use konvos_auth::{AuthService, KONVOS_ROUTE_PREFIX};

/// Plain-text liveness probe
pub async fn liveness() -> &'static str {
    "Konvos Backend is running!"
}

/// Register/login endpoints with HTTP tracing
///
/// Mount under a prefix; the endpoints are `/register` and `/login` relative to it.
pub fn konvos_auth_router(service: AuthService) -> Router {
    konvos_auth_router_no_trace(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`konvos_auth_router`] without the tracing middleware
pub fn konvos_auth_router_no_trace(service: AuthService) -> Router {
    super::auth::router(service)
}

/// The complete backend: `GET /`, the auth routes under `KONVOS_ROUTE_PREFIX`, permissive CORS
pub fn konvos_app(service: AuthService) -> Router {
    konvos_app_with_prefix(service, KONVOS_ROUTE_PREFIX.as_str())
}

/// [`konvos_app`] with an explicit route prefix
pub fn konvos_app_with_prefix(service: AuthService, prefix: &str) -> Router {
    let auth = konvos_auth_router(service);
    let prefix = prefix.trim_end_matches('/');

    let app = Router::new().route("/", get(liveness));
    let app = if prefix.is_empty() {
        app.merge(auth)
    } else {
        app.nest(prefix, auth)
    };
    app.layer(CorsLayer::permissive())
}
