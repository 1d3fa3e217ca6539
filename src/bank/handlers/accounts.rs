use super::valid_name;
use crate::bank::{
    auth::AuthorizedAccount,
    error::{ApiError, ErrorBody},
    store::{Account, DynAccountStore, NewAccount},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl std::fmt::Debug for CreateAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccountRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DeletedResponse {
    pub deleted: i64,
}

#[utoipa::path(
    post,
    path= "/accounts",
    request_body = CreateAccountRequest,
    responses (
        (status = 201, description = "Account created", body = Account, content_type = "application/json"),
        (status = 400, description = "Malformed body or invalid field", body = ErrorBody),
    ),
    tag= "accounts"
)]
#[instrument(skip_all)]
pub async fn create_account(
    Extension(store): Extension<DynAccountStore>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let Json(request) = payload?;
    debug!("request: {:?}", request);

    if !valid_name(&request.first_name) || !valid_name(&request.last_name) {
        return Err(ApiError::Validation(
            "first_name and last_name must be 1 to 50 characters".to_string(),
        ));
    }

    if request.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".to_string()));
    }

    let new_account = NewAccount::new(&request.first_name, &request.last_name, &request.password)?;
    let account = store.create_account(new_account).await?;

    info!("Created account id: {}, number: {}", account.id, account.number);

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path= "/accounts",
    responses (
        (status = 200, description = "All accounts", body = [Account], content_type = "application/json"),
    ),
    tag= "accounts"
)]
#[instrument(skip_all)]
pub async fn list_accounts(
    Extension(store): Extension<DynAccountStore>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(store.get_accounts().await?))
}

#[utoipa::path(
    get,
    path= "/accounts/{id}",
    params(
        ("id" = i64, Path, description = "Account id"),
        ("x-jwt-token" = String, Header, description = "Token issued by /login for this account"),
    ),
    responses (
        (status = 200, description = "Account owned by the token", body = Account, content_type = "application/json"),
        (status = 401, description = "Permission denied", body = ErrorBody),
    ),
    tag= "accounts"
)]
pub async fn get_account(
    Extension(AuthorizedAccount(account)): Extension<AuthorizedAccount>,
) -> Json<Account> {
    Json(account)
}

#[utoipa::path(
    delete,
    path= "/accounts/{id}",
    params(
        ("id" = i64, Path, description = "Account id"),
        ("x-jwt-token" = String, Header, description = "Token issued by /login for this account"),
    ),
    responses (
        (status = 200, description = "Account deleted", body = DeletedResponse, content_type = "application/json"),
        (status = 401, description = "Permission denied", body = ErrorBody),
        (status = 404, description = "Account already gone", body = ErrorBody),
    ),
    tag= "accounts"
)]
#[instrument(skip_all)]
pub async fn delete_account(
    Extension(store): Extension<DynAccountStore>,
    Extension(AuthorizedAccount(account)): Extension<AuthorizedAccount>,
) -> Result<Json<DeletedResponse>, ApiError> {
    store.delete_account(account.id).await?;

    info!("Deleted account id: {}", account.id);

    Ok(Json(DeletedResponse {
        deleted: account.id,
    }))
}
