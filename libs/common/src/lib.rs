//! Common library for the product catalog services
//!
//! This crate provides shared functionality used by the accounts and catalog
//! services: database connectivity and migrations, storage error handling,
//! the bearer token codec and HTTP bind configuration.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     assert!(health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod jwt;
pub mod server;
