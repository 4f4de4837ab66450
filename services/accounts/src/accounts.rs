//! Account management
//!
//! [`AccountManager`] is the only writer of credential hashes. It normalizes
//! emails, hashes passwords with Argon2 and hands finished records to the
//! configured [`UserStore`].

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::error::DatabaseError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{NewUser, User, UserProfile};
use crate::repositories::UserStore;
use crate::validation::normalize_email;

/// Errors raised by account operations
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required field is missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// The normalized email already belongs to an account
    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    /// Password hashing failed
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    /// Storage failure
    #[error(transparent)]
    Database(DatabaseError),
}

/// Creates and verifies user accounts
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn UserStore>,
}

impl AccountManager {
    /// Create a new account manager over a user store
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create and return a new account
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        extra_fields: UserProfile,
    ) -> Result<User, AccountError> {
        self.insert_account(email, password, extra_fields, false).await
    }

    /// Create and return an account flagged as staff and superuser
    pub async fn create_privileged_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        self.insert_account(email, password, UserProfile::default(), true)
            .await
    }

    /// Check a password against the stored hash for `email`
    ///
    /// Unknown emails simply do not match.
    pub async fn verify_credential(&self, email: &str, password: &str) -> Result<bool, AccountError> {
        let user = self
            .store
            .find_by_email(&normalize_email(email))
            .await
            .map_err(AccountError::Database)?;

        Ok(user.is_some_and(|u| password_matches(&u.password_hash, password)))
    }

    /// Return the active account matching the credentials, if any
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AccountError> {
        let user = self
            .store
            .find_by_email(&normalize_email(email))
            .await
            .map_err(AccountError::Database)?;

        Ok(user.filter(|u| u.is_active && password_matches(&u.password_hash, password)))
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: uuid::Uuid) -> Result<Option<User>, AccountError> {
        self.store.find_by_id(id).await.map_err(AccountError::Database)
    }

    /// Create the configured superuser unless it already exists
    ///
    /// Returns the newly created account, or `None` when the email was taken.
    pub async fn bootstrap_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AccountError> {
        match self.create_privileged_account(email, password).await {
            Ok(user) => {
                info!("Created superuser {}", user.email);
                Ok(Some(user))
            }
            Err(AccountError::EmailTaken(email)) => {
                info!("Superuser {} already exists", email);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn insert_account(
        &self,
        email: &str,
        password: &str,
        profile: UserProfile,
        privileged: bool,
    ) -> Result<User, AccountError> {
        if email.trim().is_empty() {
            return Err(AccountError::InvalidInput(
                "User must have an email".to_string(),
            ));
        }

        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let new_user = NewUser {
            email: email.clone(),
            password_hash,
            profile,
            is_staff: privileged,
            is_superuser: privileged,
        };

        self.store.insert(new_user).await.map_err(|e| match e {
            DatabaseError::Conflict(_) => AccountError::EmailTaken(email),
            other => AccountError::Database(other),
        })
    }
}

/// Hash a password with Argon2 and a random salt
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::PasswordHash(e.to_string()))
}

fn password_matches(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}
