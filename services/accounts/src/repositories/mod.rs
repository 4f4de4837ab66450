//! Account storage
//!
//! [`UserStore`] is the seam between account rules and persistence. The
//! PostgreSQL implementation backs the running service; the in-memory one
//! backs tests and local runs without a database.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod memory;
pub mod user;

pub use memory::InMemoryUserStore;
pub use user::UserRepository;

/// Persistence operations for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account
    ///
    /// Fails with [`common::error::DatabaseError::Conflict`] when the email is taken.
    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User>;

    /// Find an account by its stored (normalized) email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find an account by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
}
