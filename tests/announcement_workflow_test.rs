use std::path::PathBuf;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use campanile::{
    domain::{AccountStatus, AnnouncementQuery, AnnouncementSortField, Role, SortDirection},
    error::AppError,
    repository::{
        AccountRepository, SqliteAccountRepository, SqliteAnnouncementRepository,
        SqlitePersonRepository,
    },
    service::{AnnouncementService, AttachmentUpload, CreateAnnouncementInput},
    uploads::{UploadStore, MAX_ATTACHMENT_SIZE},
};

struct TestContext {
    pool: SqlitePool,
    service: AnnouncementService,
    public_dir: PathBuf,
    staging_dir: PathBuf,
}

async fn setup() -> anyhow::Result<TestContext> {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let base = std::env::temp_dir().join(format!("campanile-test-{}", Uuid::new_v4()));
    let public_dir = base.join("public");
    let staging_dir = base.join("staging");

    let service = AnnouncementService::new(
        Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
        Arc::new(SqlitePersonRepository::new(pool.clone())),
        UploadStore::new(public_dir.clone(), staging_dir.clone()),
    );

    Ok(TestContext {
        pool,
        service,
        public_dir,
        staging_dir,
    })
}

async fn seed_professor(pool: &SqlitePool) -> anyhow::Result<String> {
    let repo = SqliteAccountRepository::new(pool.clone());
    let account = repo
        .register(campanile::domain::RegisterAccountRequest {
            last_name: "Professor".to_string(),
            first_name: "Demo".to_string(),
            email: "prof@faculty.com".to_string(),
            password: "secure_password123".to_string(),
            phone: None,
            city: None,
            address: None,
            role: Role::Professor,
        })
        .await?;
    repo.update_status(account.id, AccountStatus::Active).await?;
    Ok(account.email)
}

async fn count(pool: &SqlitePool, table: &str) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn input_without_file(title: &str, importance: i64) -> CreateAnnouncementInput {
    CreateAnnouncementInput {
        title: title.to_string(),
        content: "Exams start Monday".to_string(),
        importance,
        attachment: None,
    }
}

#[tokio::test]
async fn test_create_without_file() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    let record = ctx
        .service
        .create(&email, input_without_file("Exam Schedule", 2))
        .await?;

    assert_eq!(record.announcement.title, "Exam Schedule");
    assert_eq!(record.announcement.importance, 2);
    assert_eq!(record.authors.len(), 1);
    assert_eq!(record.authors[0].person.email, "prof@faculty.com");
    assert!(record.document.is_none());

    assert_eq!(count(&ctx.pool, "announcements").await?, 1);
    assert_eq!(count(&ctx.pool, "announcement_authors").await?, 1);
    assert_eq!(count(&ctx.pool, "documents").await?, 0);
    assert_eq!(count(&ctx.pool, "document_authors").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_with_file() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    let input = CreateAnnouncementInput {
        title: "Exam Schedule".to_string(),
        content: "See attached file".to_string(),
        importance: 3,
        attachment: Some(AttachmentUpload {
            file_name: "schedule.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: b"%PDF-1.4 fake".to_vec(),
        }),
    };

    let record = ctx.service.create(&email, input).await?;

    let document = record.document.expect("document should be attached");
    assert_eq!(document.title, "Exam Schedule");
    assert_eq!(document.doc_type, "Annonce");
    assert_eq!(document.version, "1.0");
    assert_eq!(document.announcement_id, Some(record.announcement.id));
    assert!(document.storage_path.starts_with("uploads/"));
    assert!(document.storage_path.ends_with("schedule.pdf"));

    // The file was promoted into the public tree and nothing lingers in
    // staging.
    let promoted = ctx
        .public_dir
        .join(&document.storage_path);
    assert!(promoted.exists());
    let staged_entries: Vec<_> = std::fs::read_dir(&ctx.staging_dir)?.collect();
    assert!(staged_entries.is_empty());

    assert_eq!(count(&ctx.pool, "announcements").await?, 1);
    assert_eq!(count(&ctx.pool, "announcement_authors").await?, 1);
    assert_eq!(count(&ctx.pool, "documents").await?, 1);
    assert_eq!(count(&ctx.pool, "document_authors").await?, 1);

    // Both links point at the same person
    let author_person: String =
        sqlx::query_scalar("SELECT person_id FROM announcement_authors")
            .fetch_one(&ctx.pool)
            .await?;
    let document_person: String =
        sqlx::query_scalar("SELECT person_id FROM document_authors")
            .fetch_one(&ctx.pool)
            .await?;
    assert_eq!(author_person, document_person);

    Ok(())
}

#[tokio::test]
async fn test_rejects_disallowed_file_type() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    let input = CreateAnnouncementInput {
        title: "Bad attachment".to_string(),
        content: "Should not land".to_string(),
        importance: 1,
        attachment: Some(AttachmentUpload {
            file_name: "payload.zip".to_string(),
            content_type: "application/zip".to_string(),
            data: vec![0u8; 128],
        }),
    };

    let err = ctx.service.create(&email, input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Nothing was written anywhere
    assert_eq!(count(&ctx.pool, "announcements").await?, 0);
    assert_eq!(count(&ctx.pool, "documents").await?, 0);
    assert!(!ctx.staging_dir.exists());
    assert!(!ctx.public_dir.exists());

    Ok(())
}

#[tokio::test]
async fn test_rejects_oversized_file() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    let input = CreateAnnouncementInput {
        title: "Huge attachment".to_string(),
        content: "Should not land".to_string(),
        importance: 1,
        attachment: Some(AttachmentUpload {
            file_name: "big.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0u8; MAX_ATTACHMENT_SIZE + 1],
        }),
    };

    let err = ctx.service.create(&email, input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(count(&ctx.pool, "announcements").await?, 0);
    assert!(!ctx.staging_dir.exists());

    Ok(())
}

#[tokio::test]
async fn test_rejects_missing_fields() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    let err = ctx
        .service
        .create(&email, input_without_file("   ", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(count(&ctx.pool, "announcements").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_unknown_account_is_not_found() -> anyhow::Result<()> {
    let ctx = setup().await?;

    let err = ctx
        .service
        .create("ghost@faculty.com", input_without_file("Title", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(count(&ctx.pool, "announcements").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_listing_orders_and_limits() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    ctx.service.create(&email, input_without_file("Beta", 1)).await?;
    ctx.service.create(&email, input_without_file("Alpha", 3)).await?;
    ctx.service.create(&email, input_without_file("Gamma", 2)).await?;

    let by_title = ctx
        .service
        .list(AnnouncementQuery {
            limit: None,
            order_by: AnnouncementSortField::Title,
            direction: SortDirection::Asc,
        })
        .await?;
    let titles: Vec<&str> = by_title
        .iter()
        .map(|r| r.announcement.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    assert!(by_title.iter().all(|r| r.document.is_none()));

    let by_importance = ctx
        .service
        .list(AnnouncementQuery {
            limit: Some(2),
            order_by: AnnouncementSortField::Importance,
            direction: SortDirection::Desc,
        })
        .await?;
    let importances: Vec<i64> = by_importance
        .iter()
        .map(|r| r.announcement.importance)
        .collect();
    assert_eq!(importances, vec![3, 2]);

    Ok(())
}

#[tokio::test]
async fn test_listing_is_idempotent() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let email = seed_professor(&ctx.pool).await?;

    ctx.service.create(&email, input_without_file("Once", 1)).await?;

    let first = ctx.service.list(AnnouncementQuery::default()).await?;
    let second = ctx.service.list(AnnouncementQuery::default()).await?;

    assert_eq!(first.len(), 1);
    assert_eq!(
        serde_json::to_value(&first)?,
        serde_json::to_value(&second)?
    );

    Ok(())
}

#[tokio::test]
async fn test_listing_tolerates_empty_store() -> anyhow::Result<()> {
    let ctx = setup().await?;

    let records = ctx.service.list(AnnouncementQuery::default()).await?;
    assert!(records.is_empty());

    Ok(())
}
