//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, User, UserProfile};

const USER_COLUMNS: &str = "id, email, password_hash, name, first_name, last_name, phone, \
                            address, role, is_active, is_staff, is_superuser, created_at, updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        profile: UserProfile {
            name: row.get("name"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            phone: row.get("phone"),
            address: row.get("address"),
            role: row.get("role"),
        },
        is_active: row.get("is_active"),
        is_staff: row.get("is_staff"),
        is_superuser: row.get("is_superuser"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.email);

        let query = format!(
            r#"
            INSERT INTO users (email, password_hash, name, first_name, last_name, phone,
                               address, role, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.profile.name)
            .bind(&new_user.profile.first_name)
            .bind(&new_user.profile.last_name)
            .bind(&new_user.profile.phone)
            .bind(&new_user.profile.address)
            .bind(&new_user.profile.role)
            .bind(new_user.is_staff)
            .bind(new_user.is_superuser)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(user_from_row))
    }
}
