use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CourseModule, Program},
    error::{AppError, Result},
};

use super::modules::ModulePayload;

#[derive(Debug, Serialize)]
pub struct ProgramPayload {
    pub codef: String,
    pub intitule: String,
    pub niveau: String,
    pub duree: i64,
    pub coded: String,
}

impl From<Program> for ProgramPayload {
    fn from(program: Program) -> Self {
        Self {
            codef: program.code,
            intitule: program.title,
            niveau: program.level,
            duree: program.duration_years,
            coded: program.department_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProgramsQuery {
    pub coded: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListProgramsQuery>,
) -> Result<Json<Vec<ProgramPayload>>> {
    let programs = match params.coded {
        Some(coded) => {
            state
                .service_context
                .program_repo
                .list_by_department(&coded)
                .await?
        }
        None => state.service_context.program_repo.list().await?,
    };

    Ok(Json(programs.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(codef): Path<String>,
) -> Result<Json<ProgramPayload>> {
    let program = state
        .service_context
        .program_repo
        .find_by_code(&codef)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    Ok(Json(program.into()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 10))]
    pub codef: String,
    #[validate(length(min = 1, max = 150))]
    pub intitule: String,
    #[validate(length(min = 1, max = 50))]
    pub niveau: String,
    #[validate(range(min = 1, max = 8))]
    pub duree: i64,
    #[validate(length(min = 1, max = 10))]
    pub coded: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramPayload>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // The owning department must exist before the insert is attempted.
    state
        .service_context
        .department_repo
        .find_by_code(&req.coded)
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

    let program = state
        .service_context
        .program_repo
        .create(Program {
            code: req.codef,
            title: req.intitule,
            level: req.niveau,
            duration_years: req.duree,
            department_code: req.coded,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(program.into())))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 150))]
    pub intitule: String,
    #[validate(length(min = 1, max = 50))]
    pub niveau: String,
    #[validate(range(min = 1, max = 8))]
    pub duree: i64,
    #[validate(length(min = 1, max = 10))]
    pub coded: String,
}

pub async fn update(
    State(state): State<AppState>,
    Path(codef): Path<String>,
    Json(req): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramPayload>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let program = state
        .service_context
        .program_repo
        .update(
            &codef,
            Program {
                code: codef.clone(),
                title: req.intitule,
                level: req.niveau,
                duration_years: req.duree,
                department_code: req.coded,
            },
        )
        .await?;

    Ok(Json(program.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(codef): Path<String>,
) -> Result<StatusCode> {
    state.service_context.program_repo.delete(&codef).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_modules(
    State(state): State<AppState>,
    Path(codef): Path<String>,
) -> Result<Json<Vec<ModulePayload>>> {
    let modules = state
        .service_context
        .module_repo
        .list_by_program(&codef)
        .await?;

    Ok(Json(modules.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 150))]
    pub intitule: String,
    #[validate(range(min = 1, max = 12))]
    pub semestre: i64,
    #[validate(range(min = 1, max = 1000))]
    pub volume: i64,
}

pub async fn create_module(
    State(state): State<AppState>,
    Path(codef): Path<String>,
    Json(req): Json<CreateModuleRequest>,
) -> Result<(StatusCode, Json<ModulePayload>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .service_context
        .program_repo
        .find_by_code(&codef)
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    let module = state
        .service_context
        .module_repo
        .create(CourseModule {
            id: Uuid::new_v4(),
            title: req.intitule,
            semester: req.semestre,
            hours: req.volume,
            program_code: codef,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(module.into())))
}
