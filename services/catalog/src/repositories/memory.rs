//! In-memory product store and account lookup

use async_trait::async_trait;
use chrono::Utc;
use common::error::DatabaseResult;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ProductStore, UserLookup};
use crate::models::{NewProduct, Product, ProductChanges};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

/// Product store keeping records in a process-local map
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    table: Arc<Mutex<Table>>,
}

impl InMemoryProductStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Detach every product from `owner`, as deleting the account does
    #[cfg(test)]
    pub async fn orphan(&self, owner: Uuid) -> u64 {
        let mut table = self.table.lock().await;
        let mut orphaned = 0;
        for product in table.rows.values_mut() {
            if product.owner == Some(owner) {
                product.owner = None;
                orphaned += 1;
            }
        }
        orphaned
    }

    /// Total number of stored products regardless of owner
    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.table.lock().await.rows.len()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Product>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|p| p.owner == Some(owner))
            .cloned()
            .collect())
    }

    async fn get(&self, owner: Uuid, id: i64) -> DatabaseResult<Option<Product>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|p| p.owner == Some(owner))
            .cloned())
    }

    async fn create(&self, owner: Uuid, product: NewProduct) -> DatabaseResult<Product> {
        let mut table = self.table.lock().await;
        table.last_id += 1;

        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            owner: Some(owner),
            title: product.title,
            price: product.price,
            color: product.color,
            details: product.details,
            created: now,
            updated: now,
        };
        table.rows.insert(product.id, product.clone());

        Ok(product)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: i64,
        changes: ProductChanges,
    ) -> DatabaseResult<Option<Product>> {
        let mut table = self.table.lock().await;
        let Some(product) = table
            .rows
            .get_mut(&id)
            .filter(|p| p.owner == Some(owner))
        else {
            return Ok(None);
        };

        changes.apply(product);
        product.updated = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete(&self, owner: Uuid, id: i64) -> DatabaseResult<bool> {
        let mut table = self.table.lock().await;
        let owned = table.rows.get(&id).is_some_and(|p| p.owner == Some(owner));
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }
}

/// Account lookup over a process-local map of account states
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserLookup {
    accounts: Arc<Mutex<HashMap<Uuid, bool>>>,
}

impl InMemoryUserLookup {
    /// Create a lookup that knows no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an account and whether it is active
    pub async fn insert(&self, id: Uuid, is_active: bool) {
        self.accounts.lock().await.insert(id, is_active);
    }
}

#[async_trait]
impl UserLookup for InMemoryUserLookup {
    async fn is_active(&self, id: Uuid) -> DatabaseResult<bool> {
        Ok(self.accounts.lock().await.get(&id).copied().unwrap_or(false))
    }
}
