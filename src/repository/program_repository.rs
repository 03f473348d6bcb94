use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::Program,
    error::{AppError, Result},
    repository::ProgramRepository,
};

#[derive(FromRow)]
struct ProgramRow {
    code: String,
    title: String,
    level: String,
    duration_years: i64,
    department_code: String,
}

fn row_to_program(row: ProgramRow) -> Program {
    Program {
        code: row.code,
        title: row.title,
        level: row.level,
        duration_years: row.duration_years,
        department_code: row.department_code,
    }
}

const PROGRAM_COLUMNS: &str = "code, title, level, duration_years, department_code";

pub struct SqliteProgramRepository {
    pool: SqlitePool,
}

impl SqliteProgramRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for SqliteProgramRepository {
    async fn create(&self, program: Program) -> Result<Program> {
        if self.find_by_code(&program.code).await?.is_some() {
            return Err(AppError::Conflict("Program code already exists".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO programs (code, title, level, duration_years, department_code)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&program.code)
        .bind(&program.title)
        .bind(&program.level)
        .bind(program.duration_years)
        .bind(&program.department_code)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_code(&program.code).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created program".to_string())
        })
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Program>> {
        let row = sqlx::query_as::<_, ProgramRow>(&format!(
            "SELECT {} FROM programs WHERE code = ?",
            PROGRAM_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(row_to_program))
    }

    async fn list(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query_as::<_, ProgramRow>(&format!(
            "SELECT {} FROM programs ORDER BY title",
            PROGRAM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_program).collect())
    }

    async fn list_by_department(&self, department_code: &str) -> Result<Vec<Program>> {
        let rows = sqlx::query_as::<_, ProgramRow>(&format!(
            "SELECT {} FROM programs WHERE department_code = ? ORDER BY title",
            PROGRAM_COLUMNS
        ))
        .bind(department_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_program).collect())
    }

    async fn update(&self, code: &str, program: Program) -> Result<Program> {
        let result = sqlx::query(
            r#"
            UPDATE programs
            SET title = ?, level = ?, duration_years = ?, department_code = ?
            WHERE code = ?
            "#
        )
        .bind(&program.title)
        .bind(&program.level)
        .bind(program.duration_years)
        .bind(&program.department_code)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Program not found".to_string()));
        }

        self.find_by_code(code).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated program".to_string())
        })
    }

    async fn delete(&self, code: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM programs WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Program not found".to_string()));
        }

        Ok(())
    }
}
