use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreatePersonRequest, Person},
    error::{AppError, Result},
    repository::PersonRepository,
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
pub(crate) struct PersonRow {
    pub(crate) id: String,
    pub(crate) last_name: String,
    pub(crate) first_name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) birth_date: Option<NaiveDateTime>,
    pub(crate) created_at: NaiveDateTime,
}

pub(crate) fn row_to_person(row: PersonRow) -> Result<Person> {
    Ok(Person {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        last_name: row.last_name,
        first_name: row.first_name,
        email: row.email,
        phone: row.phone,
        city: row.city,
        address: row.address,
        birth_date: row.birth_date.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

pub struct SqlitePersonRepository {
    pool: SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn create(&self, request: CreatePersonRequest) -> Result<Person> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let id_str = id.to_string();
        let birth_date_naive = request.birth_date.map(|dt| dt.naive_utc());
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO persons (id, last_name, first_name, email, phone, city, address, birth_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&request.last_name)
        .bind(&request.first_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.city)
        .bind(&request.address)
        .bind(birth_date_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created person".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, last_name, first_name, email, phone, city, address, birth_date, created_at
            FROM persons
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_person(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, last_name, first_name, email, phone, city, address, birth_date, created_at
            FROM persons
            WHERE email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_person(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_account_email(&self, email: &str) -> Result<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT p.id, p.last_name, p.first_name, p.email, p.phone, p.city, p.address, p.birth_date, p.created_at
            FROM persons p
            JOIN accounts a ON a.person_id = p.id
            WHERE a.email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_person(r)?)),
            None => Ok(None),
        }
    }
}
