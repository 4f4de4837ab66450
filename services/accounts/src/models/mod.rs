//! Accounts service models

pub mod user;

// Re-export for convenience
pub use user::{CreateUserRequest, LoginCredentials, NewUser, User, UserProfile, UserResponse};
