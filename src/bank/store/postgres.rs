use super::{Account, AccountStore, NewAccount, StoreError};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::{debug, info_span, instrument, Instrument};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

const SELECT_COLUMNS: &str = "SELECT id, first_name, last_name, number, encrypted_password, \
                              balance, created_at FROM accounts";

/// `accounts` table backed by a shared Postgres pool.
#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `accounts` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the schema statement fails.
    #[instrument(skip(self))]
    pub async fn init(&self) -> Result<(), StoreError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "CREATE");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        debug!("accounts table ready");

        Ok(())
    }

    async fn fetch_one_where(
        &self,
        column: &'static str,
        value: i64,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!("{SELECT_COLUMNS} WHERE {column} = $1");
        let span = query_span("SELECT", &query);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }
}

fn query_span(operation: &'static str, statement: &str) -> tracing::Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

fn account_from_row(row: &PgRow) -> Result<Account, StoreError> {
    Ok(Account {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        number: row.try_get("number")?,
        encrypted_password: row.try_get("encrypted_password")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let query = "INSERT INTO accounts \
                     (first_name, last_name, encrypted_password, balance, created_at) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING id, number, created_at";
        let span = query_span("INSERT", query);

        let row = sqlx::query(query)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.encrypted_password)
            .bind(account.balance)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(Account {
            id: row.try_get("id")?,
            number: row.try_get("number")?,
            first_name: account.first_name,
            last_name: account.last_name,
            encrypted_password: account.encrypted_password,
            balance: account.balance,
            // Postgres stores microseconds; return what a later read will see.
            created_at: row.try_get("created_at")?,
        })
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        let query = "DELETE FROM accounts WHERE id = $1";
        let span = query_span("DELETE", query);

        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::account_id(id));
        }

        Ok(())
    }

    async fn update_account(&self, _account: &Account) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let query = format!("{SELECT_COLUMNS} ORDER BY id");
        let span = query_span("SELECT", &query);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        rows.iter().map(account_from_row).collect()
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.fetch_one_where("id", id)
            .await?
            .ok_or_else(|| StoreError::account_id(id))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        self.fetch_one_where("number", number)
            .await?
            .ok_or_else(|| StoreError::account_number(number))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;

        Ok(())
    }
}
