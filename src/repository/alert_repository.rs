use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Account, Alert, AlertType, AlertWithUser, NewAlert},
    error::{AppError, Result},
    repository::{account_repository, AlertRepository},
};

#[derive(FromRow)]
struct AlertRow {
    id: String,
    title: String,
    description: String,
    alert_type: String,
    account_id: String,
    created_at: NaiveDateTime,
}

// Alert joined with its account in a single pass.
#[derive(FromRow)]
struct AlertWithUserRow {
    id: String,
    title: String,
    description: String,
    alert_type: String,
    account_id: String,
    created_at: NaiveDateTime,
    account_email: String,
    display_name: String,
    role: String,
    status: String,
    person_id: String,
    account_created_at: NaiveDateTime,
    account_updated_at: NaiveDateTime,
}

fn row_to_alert(row: AlertRow) -> Result<Alert> {
    Ok(Alert {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.title,
        description: row.description,
        alert_type: AlertType::parse(&row.alert_type)
            .ok_or_else(|| AppError::Database(format!("Invalid alert type: {}", row.alert_type)))?,
        account_id: Uuid::parse_str(&row.account_id).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

pub struct SqliteAlertRepository {
    pool: SqlitePool,
}

impl SqliteAlertRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, title, description, alert_type, account_id, created_at
            FROM alerts
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_alert(r)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AlertRepository for SqliteAlertRepository {
    async fn create(&self, alert: NewAlert) -> Result<Alert> {
        let id = Uuid::new_v4();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO alerts (id, title, description, alert_type, account_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&alert.title)
        .bind(&alert.description)
        .bind(alert.alert_type.as_str())
        .bind(alert.account_id.to_string())
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created alert".to_string())
        })
    }

    async fn list_with_users(&self) -> Result<Vec<AlertWithUser>> {
        let rows = sqlx::query_as::<_, AlertWithUserRow>(
            r#"
            SELECT al.id, al.title, al.description, al.alert_type, al.account_id, al.created_at,
                   a.email AS account_email, a.display_name, a.role, a.status, a.person_id,
                   a.created_at AS account_created_at, a.updated_at AS account_updated_at
            FROM alerts al
            JOIN accounts a ON a.id = al.account_id
            ORDER BY al.created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let user = Account {
                    id: Uuid::parse_str(&row.account_id)
                        .map_err(|e| AppError::Database(e.to_string()))?,
                    email: row.account_email.clone(),
                    display_name: row.display_name.clone(),
                    role: account_repository::parse_role(&row.role)?,
                    status: account_repository::parse_status(&row.status)?,
                    person_id: Uuid::parse_str(&row.person_id)
                        .map_err(|e| AppError::Database(e.to_string()))?,
                    created_at: DateTime::from_naive_utc_and_offset(row.account_created_at, Utc),
                    updated_at: DateTime::from_naive_utc_and_offset(row.account_updated_at, Utc),
                };
                let alert = row_to_alert(AlertRow {
                    id: row.id,
                    title: row.title,
                    description: row.description,
                    alert_type: row.alert_type,
                    account_id: row.account_id,
                    created_at: row.created_at,
                })?;
                Ok(AlertWithUser { alert, user })
            })
            .collect()
    }

    async fn update(&self, id: Uuid, title: &str, description: &str, alert_type: AlertType) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query(
            "UPDATE alerts SET title = ?, description = ?, alert_type = ? WHERE id = ?"
        )
        .bind(title)
        .bind(description)
        .bind(alert_type.as_str())
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database("Alert not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM alerts WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // The store treats a missing row as an error, which surfaces as a
        // 500 to the caller.
        if result.rows_affected() == 0 {
            return Err(AppError::Database("Alert not found".to_string()));
        }

        Ok(())
    }
}
