//! Per-account access gate.
//!
//! Applied with `route_layer` on `/accounts/:id`. A request passes only when the
//! `x-jwt-token` header holds a valid token whose account number matches the
//! account stored under `:id`. Every failure produces the same `401` body.

use super::TokenService;
use crate::bank::{error::ApiError, store::Account, store::DynAccountStore};
use axum::{
    extract::{rejection::PathRejection, Extension, Path, Request},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Account loaded and authorized by the gate, available to the wrapped handler.
#[derive(Clone, Debug)]
pub struct AuthorizedAccount(pub Account);

#[instrument(skip_all)]
pub async fn require_account_owner(
    Extension(store): Extension<DynAccountStore>,
    Extension(tokens): Extension<Arc<TokenService>>,
    path: Result<Path<String>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&store, &tokens, request.headers(), path).await {
        Ok(account) => {
            request.extensions_mut().insert(AuthorizedAccount(account));
            next.run(request).await
        }
        Err(reason) => {
            debug!("Access denied: {reason}");
            ApiError::Denied.into_response()
        }
    }
}

async fn authorize(
    store: &DynAccountStore,
    tokens: &TokenService,
    headers: &HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Result<Account, &'static str> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or("missing token header")?;

    let claims = tokens.verify(token).map_err(|_| "invalid token")?;

    let Ok(Path(raw_id)) = path else {
        return Err("missing path id");
    };
    let id = raw_id.parse::<i64>().map_err(|_| "invalid path id")?;

    let account = store
        .get_account_by_id(id)
        .await
        .map_err(|_| "account lookup failed")?;

    if account.number != claims.account_number {
        return Err("account number mismatch");
    }

    Ok(account)
}
