use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        Announcement, AnnouncementAuthor, AnnouncementQuery, AnnouncementRecord,
        AnnouncementSortField, Document, NewAnnouncement, NewDocument, Person, SortDirection,
    },
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    body: String,
    published_at: NaiveDateTime,
    importance: i64,
    created_at: NaiveDateTime,
}

// Author link joined with its person, keyed by announcement for grouping.
#[derive(FromRow)]
struct AuthorLinkRow {
    announcement_id: String,
    proposed_at: NaiveDateTime,
    person_id: String,
    last_name: String,
    first_name: String,
    email: String,
    phone: Option<String>,
    city: Option<String>,
    address: Option<String>,
    birth_date: Option<NaiveDateTime>,
    person_created_at: NaiveDateTime,
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    title: String,
    doc_type: String,
    storage_path: String,
    created_at: NaiveDateTime,
    version: String,
    confidentiality: i64,
    announcement_id: Option<String>,
}

fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
    Ok(Announcement {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.title,
        body: row.body,
        published_at: DateTime::from_naive_utc_and_offset(row.published_at, Utc),
        importance: row.importance,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

fn row_to_author(row: AuthorLinkRow) -> Result<(String, AnnouncementAuthor)> {
    let author = AnnouncementAuthor {
        proposed_at: DateTime::from_naive_utc_and_offset(row.proposed_at, Utc),
        person: Person {
            id: Uuid::parse_str(&row.person_id).map_err(|e| AppError::Database(e.to_string()))?,
            last_name: row.last_name,
            first_name: row.first_name,
            email: row.email,
            phone: row.phone,
            city: row.city,
            address: row.address,
            birth_date: row.birth_date.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.person_created_at, Utc),
        },
    };
    Ok((row.announcement_id, author))
}

fn row_to_document(row: DocumentRow) -> Result<Document> {
    Ok(Document {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.title,
        doc_type: row.doc_type,
        storage_path: row.storage_path,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        version: row.version,
        confidentiality: row.confidentiality,
        announcement_id: row
            .announcement_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?,
    })
}

fn sort_column(field: AnnouncementSortField) -> &'static str {
    match field {
        AnnouncementSortField::PublishedAt => "published_at",
        AnnouncementSortField::Title => "title",
        AnnouncementSortField::Importance => "importance",
    }
}

fn sort_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

const AUTHOR_SELECT: &str = r#"
    SELECT aa.announcement_id, aa.proposed_at,
           p.id AS person_id, p.last_name, p.first_name, p.email,
           p.phone, p.city, p.address, p.birth_date,
           p.created_at AS person_created_at
    FROM announcement_authors aa
    JOIN persons p ON p.id = aa.person_id
    WHERE aa.announcement_id IN ("#;

const DOCUMENT_SELECT: &str = r#"
    SELECT id, title, doc_type, storage_path, created_at, version,
           confidentiality, announcement_id
    FROM documents
    WHERE announcement_id IN ("#;

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Author links for a batch of announcements, grouped by announcement id.
    async fn authors_for(&self, ids: &[String]) -> Result<HashMap<String, Vec<AnnouncementAuthor>>> {
        let mut grouped: HashMap<String, Vec<AnnouncementAuthor>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(AUTHOR_SELECT);
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        builder.push(") ORDER BY aa.proposed_at");

        let rows = builder
            .build_query_as::<AuthorLinkRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for row in rows {
            let (announcement_id, author) = row_to_author(row)?;
            grouped.entry(announcement_id).or_default().push(author);
        }

        Ok(grouped)
    }

    /// Attached documents for a batch of announcements. One document per
    /// announcement is expected; the earliest wins if the data disagrees.
    async fn documents_for(&self, ids: &[String]) -> Result<HashMap<String, Document>> {
        let mut grouped: HashMap<String, Document> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(DOCUMENT_SELECT);
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        builder.push(") ORDER BY created_at");

        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for row in rows {
            let key = match &row.announcement_id {
                Some(id) => id.clone(),
                None => continue,
            };
            let document = row_to_document(row)?;
            grouped.entry(key).or_insert(document);
        }

        Ok(grouped)
    }

    async fn hydrate(&self, rows: Vec<AnnouncementRow>) -> Result<Vec<AnnouncementRecord>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut authors = self.authors_for(&ids).await?;
        let mut documents = self.documents_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id.clone();
                Ok(AnnouncementRecord {
                    announcement: row_to_announcement(row)?,
                    authors: authors.remove(&id).unwrap_or_default(),
                    document: documents.remove(&id),
                })
            })
            .collect()
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create_with_document(
        &self,
        announcement: NewAnnouncement,
        author_id: Uuid,
        document: Option<NewDocument>,
    ) -> Result<AnnouncementRecord> {
        let announcement_id = Uuid::new_v4();
        let now = Utc::now();
        let now_naive = now.naive_utc();
        let announcement_id_str = announcement_id.to_string();
        let author_id_str = author_id.to_string();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO announcements (id, title, body, published_at, importance, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&announcement_id_str)
        .bind(&announcement.title)
        .bind(&announcement.body)
        .bind(now_naive)
        .bind(announcement.importance)
        .bind(now_naive)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO announcement_authors (announcement_id, person_id, proposed_at)
            VALUES (?, ?, ?)
            "#
        )
        .bind(&announcement_id_str)
        .bind(&author_id_str)
        .bind(now_naive)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(document) = document {
            let document_id_str = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO documents (id, title, doc_type, storage_path, created_at,
                                       version, confidentiality, announcement_id)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#
            )
            .bind(&document_id_str)
            .bind(&document.title)
            .bind(&document.doc_type)
            .bind(&document.storage_path)
            .bind(now_naive)
            .bind(&document.version)
            .bind(document.confidentiality)
            .bind(&announcement_id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO document_authors (document_id, person_id, published_at)
                VALUES (?, ?, ?)
                "#
            )
            .bind(&document_id_str)
            .bind(&author_id_str)
            .bind(now_naive)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit().await?;

        self.find_by_id(announcement_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementRecord>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, body, published_at, importance, created_at
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, query: AnnouncementQuery) -> Result<Vec<AnnouncementRecord>> {
        // Column and direction come from fixed allow-lists, never from the
        // raw query string.
        let order_sql = format!(
            "SELECT id, title, body, published_at, importance, created_at \
             FROM announcements ORDER BY {} {}",
            sort_column(query.order_by),
            sort_keyword(query.direction),
        );

        let rows = match query.limit {
            Some(limit) => {
                sqlx::query_as::<_, AnnouncementRow>(&format!("{} LIMIT ?", order_sql))
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, AnnouncementRow>(&order_sql)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.hydrate(rows).await
    }
}
