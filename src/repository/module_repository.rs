use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::CourseModule,
    error::{AppError, Result},
    repository::ModuleRepository,
};

#[derive(FromRow)]
struct ModuleRow {
    id: String,
    title: String,
    semester: i64,
    hours: i64,
    program_code: String,
}

fn row_to_module(row: ModuleRow) -> Result<CourseModule> {
    Ok(CourseModule {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.title,
        semester: row.semester,
        hours: row.hours,
        program_code: row.program_code,
    })
}

pub struct SqliteModuleRepository {
    pool: SqlitePool,
}

impl SqliteModuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModuleRepository for SqliteModuleRepository {
    async fn create(&self, module: CourseModule) -> Result<CourseModule> {
        let id_str = module.id.to_string();

        sqlx::query(
            r#"
            INSERT INTO course_modules (id, title, semester, hours, program_code)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&module.title)
        .bind(module.semester)
        .bind(module.hours)
        .bind(&module.program_code)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(module.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created module".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseModule>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ModuleRow>(
            "SELECT id, title, semester, hours, program_code FROM course_modules WHERE id = ?"
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_module(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_program(&self, program_code: &str) -> Result<Vec<CourseModule>> {
        let rows = sqlx::query_as::<_, ModuleRow>(
            r#"
            SELECT id, title, semester, hours, program_code
            FROM course_modules
            WHERE program_code = ?
            ORDER BY semester, title
            "#
        )
        .bind(program_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_module).collect()
    }

    async fn update(&self, id: Uuid, module: CourseModule) -> Result<CourseModule> {
        let id_str = id.to_string();

        let result = sqlx::query(
            "UPDATE course_modules SET title = ?, semester = ?, hours = ? WHERE id = ?"
        )
        .bind(&module.title)
        .bind(module.semester)
        .bind(module.hours)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Module not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated module".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM course_modules WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Module not found".to_string()));
        }

        Ok(())
    }
}
