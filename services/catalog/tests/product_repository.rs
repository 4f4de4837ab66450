//! Integration tests for the PostgreSQL product repository
//!
//! These tests need a reachable PostgreSQL instance in `DATABASE_URL` and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use std::str::FromStr;

use catalog::{
    models::{NewProduct, ProductChanges},
    repositories::{ProductRepository, ProductStore, UserLookup, UserRepository},
};
use common::{
    database::{DatabaseConfig, init_pool, run_migrations},
    error::DatabaseError,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

type TestResult = Result<(), Box<dyn std::error::Error>>;

async fn setup() -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn insert_user(pool: &PgPool, is_active: bool) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (email, password_hash, is_active)
        VALUES ($1, 'not-a-real-hash', $2)
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(is_active)
    .fetch_one(pool)
    .await
}

fn sample_product(title: &str) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        price: Decimal::from_str("10.50").unwrap(),
        color: Some("Maroon".to_string()),
        details: Some("Sample product description".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_queries_are_scoped_to_owner() -> TestResult {
    let pool = setup().await?;
    let products = ProductRepository::new(pool.clone());
    let alice = insert_user(&pool, true).await?;
    let bob = insert_user(&pool, true).await?;

    let first = products.create(alice, sample_product("first")).await?;
    let foreign = products.create(bob, sample_product("foreign")).await?;
    let second = products.create(alice, sample_product("second")).await?;

    let ids: Vec<i64> = products.list(alice).await?.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert!(products.get(alice, foreign.id).await?.is_none());
    assert!(
        products
            .update(alice, foreign.id, ProductChanges::default())
            .await?
            .is_none()
    );
    assert!(!products.delete(alice, foreign.id).await?);

    let untouched = products.get(bob, foreign.id).await?.expect("still owned by bob");
    assert_eq!(untouched.title, "foreign");

    assert!(products.delete(bob, foreign.id).await?);
    assert!(products.get(bob, foreign.id).await?.is_none());

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_partial_update_keeps_and_replacement_clears() -> TestResult {
    let pool = setup().await?;
    let products = ProductRepository::new(pool.clone());
    let owner = insert_user(&pool, true).await?;
    let product = products.create(owner, sample_product("Sample product")).await?;

    let patched = products
        .update(
            owner,
            product.id,
            ProductChanges {
                title: Some("New product".to_string()),
                ..ProductChanges::default()
            },
        )
        .await?
        .expect("owned product");
    assert_eq!(patched.title, "New product");
    assert_eq!(patched.color.as_deref(), Some("Maroon"));
    assert_eq!(patched.details.as_deref(), Some("Sample product description"));
    assert_eq!(patched.owner, Some(owner));
    assert!(patched.updated >= product.updated);

    let replaced = products
        .update(
            owner,
            product.id,
            ProductChanges {
                title: Some("Replaced".to_string()),
                price: Some(Decimal::from_str("3.00")?),
                color: Some(None),
                details: Some(None),
            },
        )
        .await?
        .expect("owned product");
    assert_eq!(replaced.title, "Replaced");
    assert_eq!(replaced.price.to_string(), "3.00");
    assert_eq!(replaced.color, None);
    assert_eq!(replaced.details, None);
    assert_eq!(replaced.created, product.created);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_deleting_owner_orphans_products() -> TestResult {
    let pool = setup().await?;
    let products = ProductRepository::new(pool.clone());
    let owner = insert_user(&pool, true).await?;
    let product = products.create(owner, sample_product("orphan")).await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(owner)
        .execute(&pool)
        .await?;

    assert!(products.list(owner).await?.is_empty());

    let remaining: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM products WHERE id = $1")
        .bind(product.id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, None);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_create_for_missing_owner_is_missing_reference() -> TestResult {
    let pool = setup().await?;
    let products = ProductRepository::new(pool);

    let err = products
        .create(Uuid::new_v4(), sample_product("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::MissingReference(_)));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_lookup_reports_activity() -> TestResult {
    let pool = setup().await?;
    let users = UserRepository::new(pool.clone());
    let active = insert_user(&pool, true).await?;
    let inactive = insert_user(&pool, false).await?;

    assert!(users.is_active(active).await?);
    assert!(!users.is_active(inactive).await?);
    assert!(!users.is_active(Uuid::new_v4()).await?);

    Ok(())
}
