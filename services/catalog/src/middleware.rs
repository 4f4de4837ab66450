//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller, available to handlers through `Extension<AuthUser>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid bearer token
/// whose subject is an existing, active account.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        debug!("Request without bearer token to {}", req.uri().path());
        return Err(ApiError::Unauthorized);
    };

    let claims = state.token_service.validate(bearer.token()).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    if !state.users.is_active(claims.sub).await? {
        debug!("Token subject {} is unknown or inactive", claims.sub);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
