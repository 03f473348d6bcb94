use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::AccountStatus,
    error::{AppError, Result},
};

use super::alerts::UserPayload;

/// Accounts awaiting approval, for the administration dashboard.
pub async fn list_pending(State(state): State<AppState>) -> Result<Json<Vec<UserPayload>>> {
    let accounts = state.service_context.account_repo.list_pending().await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UserPayload>> {
    let status = match req.status.as_str() {
        "active" => AccountStatus::Active,
        "pending" => AccountStatus::Pending,
        "suspended" => AccountStatus::Suspended,
        _ => return Err(AppError::BadRequest("Invalid account status".to_string())),
    };

    let account = state
        .service_context
        .account_repo
        .update_status(id, status)
        .await?;

    // A suspension also kills any live sessions.
    if status == AccountStatus::Suspended {
        state
            .service_context
            .auth_service
            .invalidate_account_sessions(account.id)
            .await?;
    }

    Ok(Json(account.into()))
}
