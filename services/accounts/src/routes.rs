//! Accounts service routes

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{CreateUserRequest, LoginCredentials, UserResponse},
    state::AppState,
    validation::{normalize_email, validate_email, validate_password},
};

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Create the router for the accounts service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user))
        .route("/auth/token", post(issue_token))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "accounts"
    }))
}

/// Register a new account
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if !payload.email.trim().is_empty() {
        validate_email(&normalize_email(&payload.email)).map_err(ApiError::BadRequest)?;
    }
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let user = state
        .accounts
        .create_account(&payload.email, &payload.password, payload.profile)
        .await?;

    info!("Registered account {}", user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange email and password for an access token
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(credentials) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let user = state
        .accounts
        .authenticate(&credentials.email, &credentials.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let access_token = state.token_service.issue(user.id).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.access_token_expiry(),
    }))
}

/// Return the authenticated account
pub async fn current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .accounts
        .find_by_id(caller.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(user)))
}
