use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    domain::{Account, AccountStatus},
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub account: Account,
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_cookie = jar
        .get("session")
        .ok_or(AppError::Unauthorized)?;

    let auth_service = &state.service_context.auth_service;

    let session = auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let account = state
        .service_context
        .account_repo
        .find_by_id(session.account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Only approved accounts get past the boundary.
    match account.status {
        AccountStatus::Active => {}
        AccountStatus::Pending => return Err(AppError::Forbidden),
        AccountStatus::Suspended => return Err(AppError::Unauthorized),
    }

    // Insert current user into request extensions
    request.extensions_mut().insert(CurrentUser { account });

    Ok(next.run(request).await)
}

/// Like `require_auth`, but restricted to roles that manage academic
/// structure and account approvals.
pub async fn require_staff(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_cookie = jar
        .get("session")
        .ok_or(AppError::Unauthorized)?;

    let auth_service = &state.service_context.auth_service;

    let session = auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let account = state
        .service_context
        .account_repo
        .find_by_id(session.account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if account.status != AccountStatus::Active {
        return Err(AppError::Forbidden);
    }

    if !account.role.is_staff() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { account });

    Ok(next.run(request).await)
}
