use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use campanile::{
    domain::{CourseModule, Department, Program},
    error::AppError,
    repository::{
        DepartmentRepository, ModuleRepository, ProgramRepository, SqliteDepartmentRepository,
        SqliteModuleRepository, SqliteProgramRepository,
    },
};

async fn setup() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

fn department(code: &str, name: &str) -> Department {
    Department {
        code: code.to_string(),
        name: name.to_string(),
        created_on: Utc::now(),
    }
}

fn program(code: &str, department_code: &str) -> Program {
    Program {
        code: code.to_string(),
        title: "Software Engineering".to_string(),
        level: "Master".to_string(),
        duration_years: 2,
        department_code: department_code.to_string(),
    }
}

#[tokio::test]
async fn test_department_crud() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteDepartmentRepository::new(pool.clone());

    let created = repo.create(department("INFO", "Computer Science")).await?;
    assert_eq!(created.code, "INFO");

    // Duplicate code is a conflict
    let err = repo.create(department("INFO", "Duplicate")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = repo.update_name("INFO", "Informatics").await?;
    assert_eq!(updated.name, "Informatics");

    assert_eq!(repo.list().await?.len(), 1);

    repo.delete("INFO").await?;
    assert!(repo.find_by_code("INFO").await?.is_none());

    let err = repo.delete("INFO").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_program_and_module_crud() -> anyhow::Result<()> {
    let pool = setup().await?;
    let department_repo = SqliteDepartmentRepository::new(pool.clone());
    let program_repo = SqliteProgramRepository::new(pool.clone());
    let module_repo = SqliteModuleRepository::new(pool.clone());

    department_repo.create(department("INFO", "Computer Science")).await?;
    department_repo.create(department("MATH", "Mathematics")).await?;

    program_repo.create(program("GL", "INFO")).await?;
    program_repo.create(program("MA", "MATH")).await?;

    assert_eq!(program_repo.list().await?.len(), 2);
    let info_programs = program_repo.list_by_department("INFO").await?;
    assert_eq!(info_programs.len(), 1);
    assert_eq!(info_programs[0].code, "GL");

    let module = module_repo
        .create(CourseModule {
            id: Uuid::new_v4(),
            title: "Databases".to_string(),
            semester: 1,
            hours: 48,
            program_code: "GL".to_string(),
        })
        .await?;

    let mut renamed = module.clone();
    renamed.title = "Advanced Databases".to_string();
    let updated = module_repo.update(module.id, renamed).await?;
    assert_eq!(updated.title, "Advanced Databases");

    assert_eq!(module_repo.list_by_program("GL").await?.len(), 1);

    module_repo.delete(module.id).await?;
    assert!(module_repo.find_by_id(module.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_department_delete_cascades() -> anyhow::Result<()> {
    let pool = setup().await?;
    let department_repo = SqliteDepartmentRepository::new(pool.clone());
    let program_repo = SqliteProgramRepository::new(pool.clone());
    let module_repo = SqliteModuleRepository::new(pool.clone());

    department_repo.create(department("INFO", "Computer Science")).await?;
    program_repo.create(program("GL", "INFO")).await?;
    module_repo
        .create(CourseModule {
            id: Uuid::new_v4(),
            title: "Databases".to_string(),
            semester: 1,
            hours: 48,
            program_code: "GL".to_string(),
        })
        .await?;

    department_repo.delete("INFO").await?;

    assert!(program_repo.find_by_code("GL").await?.is_none());
    assert!(module_repo.list_by_program("GL").await?.is_empty());

    Ok(())
}
