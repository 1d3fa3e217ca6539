use crate::bank::error::{ApiError, ErrorBody};
use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

/// Accepts a transfer request and echoes it back. No balances change.
#[utoipa::path(
    post,
    path= "/transfers",
    request_body = TransferRequest,
    responses (
        (status = 200, description = "Request echoed, nothing is moved", body = TransferRequest, content_type = "application/json"),
        (status = 400, description = "Malformed body", body = ErrorBody),
    ),
    tag= "transfers"
)]
#[instrument(skip_all)]
pub async fn transfer(
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferRequest>, ApiError> {
    let Json(request) = payload?;
    debug!("request: {:?}", request);

    Ok(Json(request))
}
