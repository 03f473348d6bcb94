use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use campanile::{
    domain::{AlertType, NewAlert, RegisterAccountRequest, Role},
    error::AppError,
    repository::{
        AccountRepository, AlertRepository, SqliteAccountRepository, SqliteAlertRepository,
    },
};

async fn setup() -> anyhow::Result<(SqlitePool, SqliteAlertRepository, Uuid)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let account_repo = SqliteAccountRepository::new(pool.clone());
    let account = account_repo
        .register(RegisterAccountRequest {
            last_name: "Admin".to_string(),
            first_name: "System".to_string(),
            email: "admin@faculty.com".to_string(),
            password: "secure_password123".to_string(),
            phone: None,
            city: None,
            address: None,
            role: Role::Dean,
        })
        .await?;

    let repo = SqliteAlertRepository::new(pool.clone());
    Ok((pool, repo, account.id))
}

#[tokio::test]
async fn test_alert_crud() -> anyhow::Result<()> {
    let (_pool, repo, account_id) = setup().await?;

    let alert = repo
        .create(NewAlert {
            title: "Server maintenance".to_string(),
            description: "Portal unavailable Friday night".to_string(),
            alert_type: AlertType::Warning,
            account_id,
        })
        .await?;
    assert_eq!(alert.alert_type, AlertType::Warning);

    let listed = repo.list_with_users().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].alert.id, alert.id);
    assert_eq!(listed[0].user.email, "admin@faculty.com");

    repo.update(alert.id, "Maintenance done", "All systems back", AlertType::Info)
        .await?;
    let listed = repo.list_with_users().await?;
    assert_eq!(listed[0].alert.title, "Maintenance done");
    assert_eq!(listed[0].alert.alert_type, AlertType::Info);

    repo.delete(alert.id).await?;
    assert!(repo.list_with_users().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_alert_is_store_error() -> anyhow::Result<()> {
    let (_pool, repo, _account_id) = setup().await?;

    let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    Ok(())
}

#[tokio::test]
async fn test_update_missing_alert_is_store_error() -> anyhow::Result<()> {
    let (_pool, repo, _account_id) = setup().await?;

    let err = repo
        .update(Uuid::new_v4(), "t", "d", AlertType::Error)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    Ok(())
}

#[test]
fn test_alert_type_allow_list() {
    assert_eq!(AlertType::parse("error"), Some(AlertType::Error));
    assert_eq!(AlertType::parse("warning"), Some(AlertType::Warning));
    assert_eq!(AlertType::parse("info"), Some(AlertType::Info));
    assert_eq!(AlertType::parse("urgent"), None);
    assert_eq!(AlertType::parse("ERROR"), None);
}
