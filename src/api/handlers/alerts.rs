use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Account, AccountStatus, AlertType, AlertWithUser, NewAlert, Role},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl From<Account> for UserPayload {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.display_name,
            role: account.role,
            status: account.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertPayload {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub user: Option<UserPayload>,
}

impl From<AlertWithUser> for AlertPayload {
    fn from(item: AlertWithUser) -> Self {
        Self {
            id: item.alert.id,
            title: item.alert.title,
            description: item.alert.description,
            alert_type: item.alert.alert_type,
            user_id: item.alert.account_id,
            created_at: item.alert.created_at,
            user: Some(item.user.into()),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<AlertPayload>>> {
    let alerts = state.service_context.alert_repo.list_with_users().await?;

    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub title: String,
    pub description: String,
    /// Checked against the allow-list by hand so violations come back as a
    /// 400 rather than a body-deserialization error.
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateAlertRequest>,
) -> Result<Json<AlertPayload>> {
    let alert_type = AlertType::parse(&req.alert_type)
        .ok_or_else(|| AppError::BadRequest("Invalid alert type".to_string()))?;

    let alert = state
        .service_context
        .alert_repo
        .create(NewAlert {
            title: req.title,
            description: req.description,
            alert_type,
            account_id: req.user_id,
        })
        .await?;

    let user = state
        .service_context
        .account_repo
        .find_by_id(alert.account_id)
        .await?;

    Ok(Json(AlertPayload {
        id: alert.id,
        title: alert.title,
        description: alert.description,
        alert_type: alert.alert_type,
        user_id: alert.account_id,
        created_at: alert.created_at,
        user: user.map(Into::into),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlertRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: String,
}

pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateAlertRequest>,
) -> Result<Json<serde_json::Value>> {
    let alert_type = AlertType::parse(&req.alert_type)
        .ok_or_else(|| AppError::BadRequest("Invalid alert type".to_string()))?;

    state
        .service_context
        .alert_repo
        .update(req.id, &req.title, &req.description, alert_type)
        .await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteAlertRequest {
    pub id: Uuid,
}

pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteAlertRequest>,
) -> Result<Json<serde_json::Value>> {
    state.service_context.alert_repo.delete(req.id).await?;

    Ok(Json(json!({ "success": true })))
}
