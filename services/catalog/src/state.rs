//! Application state shared across handlers

use common::jwt::TokenService;
use std::sync::Arc;

use crate::repositories::{ProductStore, UserLookup};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserLookup>,
    pub token_service: TokenService,
}
