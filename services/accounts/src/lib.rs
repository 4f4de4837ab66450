//! Accounts service
//!
//! Registers users, verifies credentials and issues the bearer tokens the
//! catalog service accepts.

pub mod accounts;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
