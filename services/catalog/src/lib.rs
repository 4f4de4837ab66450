//! Catalog service
//!
//! Serves the owner-scoped `products` resource. Callers authenticate with a
//! bearer token issued by the accounts service.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod serializers;
pub mod state;
