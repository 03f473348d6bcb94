use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::Department,
    error::{AppError, Result},
    repository::DepartmentRepository,
};

#[derive(FromRow)]
struct DepartmentRow {
    code: String,
    name: String,
    created_on: NaiveDateTime,
}

fn row_to_department(row: DepartmentRow) -> Department {
    Department {
        code: row.code,
        name: row.name,
        created_on: DateTime::from_naive_utc_and_offset(row.created_on, Utc),
    }
}

pub struct SqliteDepartmentRepository {
    pool: SqlitePool,
}

impl SqliteDepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for SqliteDepartmentRepository {
    async fn create(&self, department: Department) -> Result<Department> {
        if self.find_by_code(&department.code).await?.is_some() {
            return Err(AppError::Conflict("Department code already exists".to_string()));
        }

        sqlx::query(
            "INSERT INTO departments (code, name, created_on) VALUES (?, ?, ?)"
        )
        .bind(&department.code)
        .bind(&department.name)
        .bind(department.created_on.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_code(&department.code).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created department".to_string())
        })
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            "SELECT code, name, created_on FROM departments WHERE code = ?"
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(row_to_department))
    }

    async fn list(&self) -> Result<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            "SELECT code, name, created_on FROM departments ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_department).collect())
    }

    async fn update_name(&self, code: &str, name: &str) -> Result<Department> {
        let result = sqlx::query("UPDATE departments SET name = ? WHERE code = ?")
            .bind(name)
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department not found".to_string()));
        }

        self.find_by_code(code).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated department".to_string())
        })
    }

    async fn delete(&self, code: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM departments WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department not found".to_string()));
        }

        Ok(())
    }
}
