use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::Department,
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct DepartmentPayload {
    pub coded: String,
    pub nom: String,
    pub date_creat: DateTime<Utc>,
}

impl From<Department> for DepartmentPayload {
    fn from(department: Department) -> Self {
        Self {
            coded: department.code,
            nom: department.name,
            date_creat: department.created_on,
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DepartmentPayload>>> {
    let departments = state.service_context.department_repo.list().await?;

    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(coded): Path<String>,
) -> Result<Json<DepartmentPayload>> {
    let department = state
        .service_context
        .department_repo
        .find_by_code(&coded)
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

    Ok(Json(department.into()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 10))]
    pub coded: String,
    #[validate(length(min = 1, max = 100))]
    pub nom: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentPayload>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let department = state
        .service_context
        .department_repo
        .create(Department {
            code: req.coded,
            name: req.nom,
            created_on: Utc::now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(department.into())))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: String,
}

pub async fn update(
    State(state): State<AppState>,
    Path(coded): Path<String>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<Json<DepartmentPayload>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let department = state
        .service_context
        .department_repo
        .update_name(&coded, &req.nom)
        .await?;

    Ok(Json(department.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(coded): Path<String>,
) -> Result<StatusCode> {
    state.service_context.department_repo.delete(&coded).await?;

    Ok(StatusCode::NO_CONTENT)
}
