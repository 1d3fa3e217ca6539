pub mod auth;
pub mod error;
pub mod handlers;
pub mod store;

mod openapi;

pub use openapi::openapi;

use anyhow::{Context, Result};
use auth::{require_account_owner, TokenService, TOKEN_HEADER};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use handlers::accounts;
use std::sync::Arc;
use store::{Account, DynAccountStore, NewAccount};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

const SEED_ACCOUNTS: [(&str, &str); 2] = [("John", "Doe"), ("Jane", "Doe")];
const SEED_PASSWORD: &str = "password";

/// Build the application router.
///
/// `/accounts/:id` sits behind [`require_account_owner`]; everything else is open.
pub fn router(store: DynAccountStore, tokens: Arc<TokenService>) -> Router {
    let protected = Router::new()
        .route(
            "/accounts/:id",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route_layer(from_fn(require_account_owner));

    Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/login", post(handlers::login))
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/transfers", post(handlers::transfer))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(Extension(store))
        .layer(Extension(tokens))
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, store: DynAccountStore, tokens: Arc<TokenService>) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(TOKEN_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any);

    let app = router(store, tokens).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors),
    );

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

/// Insert the demo accounts John Doe and Jane Doe, both with password `password`.
///
/// # Errors
/// Return error if hashing or inserting fails
pub async fn seed_accounts(store: &DynAccountStore) -> Result<Vec<Account>> {
    let mut seeded = Vec::with_capacity(SEED_ACCOUNTS.len());

    for (first_name, last_name) in SEED_ACCOUNTS {
        let new_account = NewAccount::new(first_name, last_name, SEED_PASSWORD)
            .with_context(|| format!("Failed to prepare seed account {first_name} {last_name}"))?;
        let account = store
            .create_account(new_account)
            .await
            .with_context(|| format!("Failed to seed account {first_name} {last_name}"))?;

        info!(
            "Seeded account {} {} id: {}, number: {}",
            account.first_name, account.last_name, account.id, account.number
        );

        seeded.push(account);
    }

    Ok(seeded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bank::{auth::password, store::MemoryAccountStore};

    #[tokio::test]
    async fn seed_creates_two_loginable_accounts() {
        let store: DynAccountStore = Arc::new(MemoryAccountStore::new());
        let seeded = seed_accounts(&store).await.unwrap();

        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].first_name, "John");
        assert_eq!(seeded[1].first_name, "Jane");
        for account in &seeded {
            let stored = store.get_account_by_number(account.number).await.unwrap();
            assert!(password::verify_password(SEED_PASSWORD, &stored.encrypted_password).is_ok());
        }
    }
}
