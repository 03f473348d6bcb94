use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Campanile API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Administrative portal backend for university faculties",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login",
            "announcements": "/api/announcements",
            "departments": "/api/departements",
            "programs": "/api/filieres",
            "alerts": "/api/alerts"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
