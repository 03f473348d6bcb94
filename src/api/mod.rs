pub mod handlers;
pub mod middleware;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{config::Settings, service::ServiceContext, uploads::MAX_ATTACHMENT_SIZE};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings.clone());

    // Promoted attachments are served straight off the public tree.
    let uploads_dir = Path::new(&settings.uploads.public_dir).join("uploads");

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/register", post(handlers::auth::register))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        // Uploaded attachment files, addressed by their stored relative path
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes(state.clone()))
        .nest("/alerts", alert_routes())
        .nest("/departements", department_routes(state.clone()))
        .nest("/filieres", program_routes(state.clone()))
        .nest("/modules", module_routes(state.clone()))
        .nest("/accounts", account_routes(state))
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public route (no auth required for reading)
        .route("/", get(handlers::announcements::list))
        // Protected route - any active account may post
        .nest("/", Router::new()
            .route("/", post(handlers::announcements::create))
            // Attachment cap plus some slack for the other form fields
            .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_SIZE + 64 * 1024))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            ))
        )
}

fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::alerts::list))
        .route("/", post(handlers::alerts::create))
        .route("/", put(handlers::alerts::update))
        .route("/", delete(handlers::alerts::delete))
}

fn department_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/", get(handlers::departments::list))
        .route("/:coded", get(handlers::departments::get))
        // Protected routes - staff only
        .nest("/", Router::new()
            .route("/", post(handlers::departments::create))
            .route("/:coded", put(handlers::departments::update))
            .route("/:coded", delete(handlers::departments::delete))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_staff,
            ))
        )
}

fn program_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/", get(handlers::programs::list))
        .route("/:codef", get(handlers::programs::get))
        .route("/:codef/modules", get(handlers::programs::list_modules))
        // Protected routes - staff only
        .nest("/", Router::new()
            .route("/", post(handlers::programs::create))
            .route("/:codef", put(handlers::programs::update))
            .route("/:codef", delete(handlers::programs::delete))
            .route("/:codef/modules", post(handlers::programs::create_module))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_staff,
            ))
        )
}

fn module_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:idm", put(handlers::modules::update))
        .route("/:idm", delete(handlers::modules::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_staff,
        ))
}

fn account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/pending", get(handlers::accounts::list_pending))
        .route("/:id/status", put(handlers::accounts::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_staff,
        ))
}
