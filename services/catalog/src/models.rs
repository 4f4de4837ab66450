//! Catalog domain models

pub mod product;

pub use product::{NewProduct, Product, ProductChanges};
