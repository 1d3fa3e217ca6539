use super::{Account, AccountStore, NewAccount, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct State {
    next_id: i64,
    next_number: i64,
    accounts: BTreeMap<i64, Account>,
}

/// Process-local store with the same id/number sequencing as the Postgres table.
#[derive(Debug)]
pub struct MemoryAccountStore {
    state: RwLock<State>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                next_number: 1,
                accounts: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.state.write().await;

        let created = Account {
            id: state.next_id,
            number: state.next_number,
            first_name: account.first_name,
            last_name: account.last_name,
            encrypted_password: account.encrypted_password,
            balance: account.balance,
            created_at: account.created_at,
        };

        state.next_id += 1;
        state.next_number += 1;
        state.accounts.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::account_id(id))
    }

    async fn update_account(&self, _account: &Account) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.state.read().await.accounts.values().cloned().collect())
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.state
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::account_id(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        self.state
            .read()
            .await
            .accounts
            .values()
            .find(|account| account.number == number)
            .cloned()
            .ok_or_else(|| StoreError::account_number(number))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
