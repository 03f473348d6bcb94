use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use campanile::{
    api,
    auth::AuthService,
    config::Settings,
    domain::{AccountStatus, RegisterAccountRequest, Role},
    repository::{self, AccountRepository},
    service::ServiceContext,
    uploads::UploadStore,
};

async fn build_app() -> anyhow::Result<(Router, SqlitePool)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let base = std::env::temp_dir().join(format!("campanile-api-test-{}", Uuid::new_v4()));
    let mut settings = Settings::default();
    settings.uploads.public_dir = base.join("public").to_string_lossy().into_owned();
    settings.uploads.staging_dir = base.join("staging").to_string_lossy().into_owned();

    let auth_service = Arc::new(AuthService::new(pool.clone()));
    let uploads = UploadStore::new(
        settings.uploads.public_dir.clone(),
        settings.uploads.staging_dir.clone(),
    );

    let service_context = Arc::new(ServiceContext::new(
        Arc::new(repository::SqlitePersonRepository::new(pool.clone())),
        Arc::new(repository::SqliteAccountRepository::new(pool.clone())),
        Arc::new(repository::SqliteDepartmentRepository::new(pool.clone())),
        Arc::new(repository::SqliteProgramRepository::new(pool.clone())),
        Arc::new(repository::SqliteModuleRepository::new(pool.clone())),
        Arc::new(repository::SqliteAnnouncementRepository::new(pool.clone())),
        Arc::new(repository::SqliteAlertRepository::new(pool.clone())),
        auth_service,
        uploads,
        pool.clone(),
    ));

    let app = api::create_app(service_context, Arc::new(settings));
    Ok((app, pool))
}

async fn register_dean(pool: &SqlitePool, activate: bool) -> anyhow::Result<()> {
    let repo = repository::SqliteAccountRepository::new(pool.clone());
    let account = repo
        .register(RegisterAccountRequest {
            last_name: "Admin".to_string(),
            first_name: "System".to_string(),
            email: "admin@faculty.com".to_string(),
            password: "123456".to_string(),
            phone: None,
            city: None,
            address: None,
            role: Role::Dean,
        })
        .await?;
    if activate {
        repo.update_status(account.id, AccountStatus::Active).await?;
    }
    Ok(())
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": "admin@faculty.com", "password": "123456" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()?
        .split(';')
        .next()
        .unwrap()
        .to_string();

    Ok(cookie)
}

#[tokio::test]
async fn test_health_endpoint() -> anyhow::Result<()> {
    let (app, _pool) = build_app().await?;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_create_announcement_requires_session() -> anyhow::Result<()> {
    let (app, pool) = build_app().await?;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/announcements")
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUND")
                .body(Body::from("--XBOUND--\r\n"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM announcements")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn test_alert_with_invalid_type_is_rejected() -> anyhow::Result<()> {
    let (app, pool) = build_app().await?;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/alerts",
            serde_json::json!({
                "title": "Broken",
                "description": "Bad type",
                "type": "urgent",
                "userId": Uuid::new_v4(),
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_alert_is_internal_error() -> anyhow::Result<()> {
    let (app, _pool) = build_app().await?;

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/api/alerts",
            serde_json::json!({ "id": Uuid::new_v4() }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn test_pending_account_cannot_login() -> anyhow::Result<()> {
    let (app, pool) = build_app().await?;
    register_dean(&pool, false).await?;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": "admin@faculty.com", "password": "123456" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await?;
    assert_eq!(sessions, 0);

    Ok(())
}

#[tokio::test]
async fn test_login_returns_role_redirect() -> anyhow::Result<()> {
    let (app, pool) = build_app().await?;
    register_dean(&pool, true).await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": "admin@faculty.com", "password": "123456" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["role"], "dean");
    assert_eq!(body["redirect"], "/dean/dashboard");

    Ok(())
}

#[tokio::test]
async fn test_announcement_roundtrip_over_http() -> anyhow::Result<()> {
    let (app, pool) = build_app().await?;
    register_dean(&pool, true).await?;
    let cookie = login(&app).await?;

    let boundary = "XBOUNDARY";
    let form = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nExam Schedule\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\nExams start Monday\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"importance\"\r\n\r\n2\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/announcements")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .header(header::COOKIE, &cookie)
                .body(Body::from(form))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["data"]["titre"], "Exam Schedule");
    assert_eq!(body["data"]["deg_imp"], 2);
    assert_eq!(
        body["data"]["personne_annonce"][0]["personnes"]["email"],
        "admin@faculty.com"
    );

    let response = app
        .oneshot(Request::builder().uri("/api/announcements").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await?;
    let items = listed.as_array().expect("listing should be an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["titre"], "Exam Schedule");
    assert!(items[0]["document"].is_null());

    Ok(())
}
