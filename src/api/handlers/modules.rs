use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::CourseModule,
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct ModulePayload {
    pub idm: Uuid,
    pub intitule: String,
    pub semestre: i64,
    pub volume: i64,
    pub codef: String,
}

impl From<CourseModule> for ModulePayload {
    fn from(module: CourseModule) -> Self {
        Self {
            idm: module.id,
            intitule: module.title,
            semestre: module.semester,
            volume: module.hours,
            codef: module.program_code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1, max = 150))]
    pub intitule: String,
    #[validate(range(min = 1, max = 12))]
    pub semestre: i64,
    #[validate(range(min = 1, max = 1000))]
    pub volume: i64,
}

pub async fn update(
    State(state): State<AppState>,
    Path(idm): Path<Uuid>,
    Json(req): Json<UpdateModuleRequest>,
) -> Result<Json<ModulePayload>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = state
        .service_context
        .module_repo
        .find_by_id(idm)
        .await?
        .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

    let module = state
        .service_context
        .module_repo
        .update(
            idm,
            CourseModule {
                id: idm,
                title: req.intitule,
                semester: req.semestre,
                hours: req.volume,
                program_code: existing.program_code,
            },
        )
        .await?;

    Ok(Json(module.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(idm): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.module_repo.delete(idm).await?;

    Ok(StatusCode::NO_CONTENT)
}
