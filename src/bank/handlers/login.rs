use crate::bank::{
    auth::{password, TokenService},
    error::{ApiError, ErrorBody},
    store::{DynAccountStore, StoreError},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("number", &self.number)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 401, description = "Unknown account number or wrong password", body = ErrorBody),
    ),
    tag= "login"
)]
#[instrument(skip_all)]
pub async fn login(
    Extension(store): Extension<DynAccountStore>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    debug!("request: {:?}", request);

    // Unknown number and wrong password must be indistinguishable.
    let account = match store.get_account_by_number(request.number).await {
        Ok(account) => account,
        Err(StoreError::NotFound(what)) => {
            debug!("Login failed: {what} not found");
            return Err(ApiError::InvalidCredentials);
        }
        Err(err) => return Err(err.into()),
    };

    password::verify_password(&request.password, &account.encrypted_password).map_err(|e| {
        debug!("Login failed for account number {}: {e}", account.number);
        ApiError::from(e)
    })?;

    let token = tokens.issue(account.number)?;

    Ok(Json(LoginResponse { token }))
}
