use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use konvos_auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest};

use crate::error::{ErrorResponse, IntoResponseError, error_response};

pub(crate) fn router(service: AuthService) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(service)
}

pub(crate) async fn register(
    State(service): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected register body: {}", rejection);
        error_response(StatusCode::BAD_REQUEST, "Missing required fields")
    })?;

    let response = service.register(request).await.into_response_error()?;
    Ok(Json(response))
}

pub(crate) async fn login(
    State(service): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected login body: {}", rejection);
        error_response(StatusCode::BAD_REQUEST, "Missing credentials")
    })?;

    let response = service.login(request).await.into_response_error()?;
    Ok(Json(response))
}
