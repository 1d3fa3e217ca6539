//! Account persistence.
//!
//! Handlers and the access gate only see the [`AccountStore`] trait. The
//! production server plugs in [`PgAccountStore`]; tests and `--in-memory` runs
//! use [`MemoryAccountStore`].

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use crate::bank::auth::{password, AuthError};

/// Shared handle injected into handlers and the access gate.
pub type DynAccountStore = Arc<dyn AccountStore>;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet. The store assigns `id` and `number`.
#[derive(Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a zero-balance account, hashing the plaintext password.
    ///
    /// # Errors
    /// Returns [`AuthError::Hashing`] if the password cannot be hashed.
    pub fn new(first_name: &str, last_name: &str, plaintext: &str) -> Result<Self, AuthError> {
        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            encrypted_password: password::hash_password(plaintext)?,
            balance: 0,
            created_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("encrypted_password", &"***")
            .field("balance", &self.balance)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    #[must_use]
    pub fn account_id(id: i64) -> Self {
        Self::NotFound(format!("account with id {id}"))
    }

    #[must_use]
    pub fn account_number(number: i64) -> Self {
        Self::NotFound(format!("account with number {number}"))
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned `id` and `number`.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    /// Declared for completeness; balances are never mutated, so implementations do nothing.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// Cheap liveness probe used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_account_hashes_password() {
        let account = NewAccount::new("John", "Doe", "password").unwrap();
        assert_eq!(account.first_name, "John");
        assert_eq!(account.last_name, "Doe");
        assert_eq!(account.balance, 0);
        assert_ne!(account.encrypted_password, "password");
        assert!(password::verify_password("password", &account.encrypted_password).is_ok());
    }

    #[test]
    fn new_account_debug_hides_hash() {
        let account = NewAccount::new("John", "Doe", "password").unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains(&account.encrypted_password));
    }

    #[test]
    fn not_found_messages() {
        assert_eq!(
            StoreError::account_id(7).to_string(),
            "account with id 7 not found"
        );
        assert_eq!(
            StoreError::account_number(42).to_string(),
            "account with number 42 not found"
        );
    }
}
