//! Account API endpoints

use api_types::account::{AccountCreated, AccountNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn open(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let account_id = state
        .engine
        .open_account(&owner_id, payload.opening_balance_minor)
        .await?;
    Ok((StatusCode::CREATED, Json(AccountCreated { account_id })))
}
