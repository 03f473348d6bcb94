use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campanile::{
    api,
    auth::AuthService,
    config::Settings,
    repository,
    service::ServiceContext,
    uploads::UploadStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campanile=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Campanile server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(db_pool.clone()));

    // Initialize repositories
    let person_repo = Arc::new(repository::SqlitePersonRepository::new(db_pool.clone()));
    let account_repo = Arc::new(repository::SqliteAccountRepository::new(db_pool.clone()));
    let department_repo = Arc::new(repository::SqliteDepartmentRepository::new(db_pool.clone()));
    let program_repo = Arc::new(repository::SqliteProgramRepository::new(db_pool.clone()));
    let module_repo = Arc::new(repository::SqliteModuleRepository::new(db_pool.clone()));
    let announcement_repo = Arc::new(repository::SqliteAnnouncementRepository::new(db_pool.clone()));
    let alert_repo = Arc::new(repository::SqliteAlertRepository::new(db_pool.clone()));

    // Staged uploads live next to the public tree until their transaction
    // commits
    let uploads = UploadStore::new(
        settings.uploads.public_dir.clone(),
        settings.uploads.staging_dir.clone(),
    );

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        person_repo,
        account_repo,
        department_repo,
        program_repo,
        module_repo,
        announcement_repo,
        alert_repo,
        auth_service,
        uploads,
        db_pool.clone(),
    ));

    let settings = Arc::new(settings);
    let app = api::create_app(service_context, settings.clone());

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
