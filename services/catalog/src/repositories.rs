//! Owner-scoped product storage
//!
//! Every [`ProductStore`] method takes the caller's id and only ever sees rows
//! owned by that caller. A product belonging to someone else is
//! indistinguishable from one that does not exist.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewProduct, Product, ProductChanges};

pub mod memory;
pub mod product;
pub mod user;

pub use memory::{InMemoryProductStore, InMemoryUserLookup};
pub use product::ProductRepository;
pub use user::UserRepository;

/// Persistence operations for products, filtered by owner
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products owned by `owner`, newest id first
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Product>>;

    /// A single product, if `owner` owns it
    async fn get(&self, owner: Uuid, id: i64) -> DatabaseResult<Option<Product>>;

    /// Insert a product owned by `owner`
    async fn create(&self, owner: Uuid, product: NewProduct) -> DatabaseResult<Product>;

    /// Apply `changes` to a product `owner` owns, returning the updated record
    async fn update(
        &self,
        owner: Uuid,
        id: i64,
        changes: ProductChanges,
    ) -> DatabaseResult<Option<Product>>;

    /// Delete a product `owner` owns; `false` when nothing matched
    async fn delete(&self, owner: Uuid, id: i64) -> DatabaseResult<bool>;
}

/// Read-only view of the accounts the catalog serves
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Whether `id` names an existing, active account
    async fn is_active(&self, id: Uuid) -> DatabaseResult<bool>;
}
