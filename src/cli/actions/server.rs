use crate::bank::{
    self,
    auth::TokenService,
    store::{DynAccountStore, MemoryAccountStore, PgAccountStore},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub in_memory: bool,
    pub seed: bool,
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the token secret is unusable, the database is
/// unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let tokens = Arc::new(
        TokenService::new(&args.jwt_secret, args.token_ttl_seconds)
            .context("Invalid token configuration")?,
    );

    let store: DynAccountStore = if args.in_memory {
        info!("Using in-memory account store");
        Arc::new(MemoryAccountStore::new())
    } else {
        let dsn = args
            .dsn
            .as_deref()
            .context("missing required argument: --dsn")?;

        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = PgAccountStore::new(pool);
        store
            .init()
            .await
            .context("Failed to create accounts table")?;

        Arc::new(store)
    };

    if args.seed {
        bank::seed_accounts(&store).await?;
    }

    bank::new(args.port, store, tokens).await
}

fn log_startup_args(args: &Args) {
    let dsn = args
        .dsn
        .as_deref()
        .map_or_else(|| "none".to_string(), redact_dsn);

    info!(
        "Starting {} {} on port {} (store: {}, dsn: {}, token ttl: {}s, seed: {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        args.port,
        if args.in_memory { "memory" } else { "postgres" },
        dsn,
        args.token_ttl_seconds,
        args.seed
    );
}

/// Replace the password in a connection string so it can be logged.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("***")).is_err() {
                return "<redacted>".to_string();
            }
            url.to_string()
        }
        Err(_) => "<redacted>".to_string(),
    }
}
