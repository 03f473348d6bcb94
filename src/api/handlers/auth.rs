use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::AuthService,
    domain::{AccountStatus, RegisterAccountRequest, Role},
    error::{AppError, Result},
    repository::account_repository,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub role: Role,
    /// Dashboard path for the caller's role; clients follow it instead of
    /// switching on role strings themselves.
    pub redirect: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    // Get password hash from database
    let password_hash =
        account_repository::get_password_hash(&state.service_context.db_pool, &req.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

    // Verify password
    if !AuthService::verify_password(&req.password, &password_hash).await? {
        return Err(AppError::Unauthorized);
    }

    let account = state
        .service_context
        .account_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Status gates login: a pending registration is not a wrong password.
    match account.status {
        AccountStatus::Active => {}
        AccountStatus::Pending => {
            return Err(AppError::Forbidden);
        }
        AccountStatus::Suspended => return Err(AppError::Unauthorized),
    }

    let duration = state.settings.auth.session_duration_hours;
    let (_session, token) = state
        .service_context
        .auth_service
        .create_session(account.id, duration)
        .await?;

    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, false);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            role: account.role,
            redirect: account.role.dashboard_path(),
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get("session") {
        // Invalidate session in database
        let _ = state
            .service_context
            .auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    // Remove cookie
    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: String,
    #[validate(length(min = 1, max = 100))]
    pub prenom: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub tele: Option<String>,
    pub ville: Option<String>,
    pub adr: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Creates the Person and a pending Account in one transaction. The account
/// cannot log in until an administrator approves it.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = RegisterAccountRequest {
        last_name: req.nom,
        first_name: req.prenom,
        email: req.email,
        password: req.password,
        phone: req.tele,
        city: req.ville,
        address: req.adr,
        role: req.role.unwrap_or(Role::Student),
    };

    state.service_context.account_repo.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created, awaiting approval".to_string(),
        }),
    ))
}
