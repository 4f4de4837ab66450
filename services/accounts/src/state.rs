//! Application state shared across handlers

use common::jwt::TokenService;

use crate::accounts::AccountManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountManager,
    pub token_service: TokenService,
}
