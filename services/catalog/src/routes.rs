//! Catalog service routes
//!
//! The `products` resource. Every handler passes the authenticated caller to
//! the store, which only returns that caller's rows; a product owned by
//! someone else therefore answers 404 rather than 403.

use axum::{
    Extension, Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{MethodRouter, get},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    serializers::{ProductAction, ProductPatch, ProductPayload, ProductReplacement, ProductView},
    state::AppState,
};

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let collection: MethodRouter<AppState> = get(list_products).post(create_product);
    let member: MethodRouter<AppState> = get(retrieve_product)
        .put(update_product)
        .patch(partial_update_product)
        .delete(destroy_product);

    let protected_routes = Router::new()
        .route("/products", collection.clone())
        .route("/products/", collection)
        .route("/products/:id", member.clone())
        .route("/products/:id/", member)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog"
    }))
}

fn parse_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::InvalidInput(e.body_text()))
}

fn parse_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|e| ApiError::InvalidInput(e.body_text()))
}

/// List the caller's products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.products.list(caller.id).await?;

    Ok(Json(
        products
            .iter()
            .map(|p| ProductAction::List.shape(p))
            .collect(),
    ))
}

/// Create a product owned by the caller
pub async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let product = parse_body(payload)?
        .into_new_product()
        .map_err(ApiError::InvalidInput)?;

    let product = state.products.create(caller.id, product).await?;
    info!("User {} created product {}", caller.id, product.id);

    Ok((
        StatusCode::CREATED,
        Json(ProductAction::Create.shape(&product)),
    ))
}

/// Retrieve one of the caller's products
pub async fn retrieve_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(id)?;
    let product = state
        .products
        .get(caller.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProductAction::Retrieve.shape(&product)))
}

/// Replace every writable field of one of the caller's products
pub async fn update_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductReplacement>, JsonRejection>,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(id)?;
    let changes = parse_body(payload)?
        .into_changes()
        .map_err(ApiError::InvalidInput)?;

    let product = state
        .products
        .update(caller.id, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProductAction::Update.shape(&product)))
}

/// Change only the supplied fields of one of the caller's products
pub async fn partial_update_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(id)?;
    let changes = parse_body(payload)?
        .into_changes()
        .map_err(ApiError::InvalidInput)?;

    let product = state
        .products
        .update(caller.id, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProductAction::PartialUpdate.shape(&product)))
}

/// Delete one of the caller's products
pub async fn destroy_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_id(id)?;
    if state.products.delete(caller.id, id).await? {
        info!("User {} deleted product {}", caller.id, id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
