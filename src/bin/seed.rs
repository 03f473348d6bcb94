use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use campanile::{
    domain::{
        AccountStatus, CourseModule, Department, NewAnnouncement, Program,
        RegisterAccountRequest, Role,
    },
    repository::{
        AccountRepository, AnnouncementRepository, DepartmentRepository, ModuleRepository,
        PersonRepository, ProgramRepository, SqliteAccountRepository,
        SqliteAnnouncementRepository, SqliteDepartmentRepository, SqliteModuleRepository,
        SqlitePersonRepository, SqliteProgramRepository,
    },
};
use chrono::Utc;

const DEMO_PASSWORD: &str = "123456";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    // Initialize database connection
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:campanile.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize repositories
    let person_repo = SqlitePersonRepository::new(db_pool.clone());
    let account_repo = SqliteAccountRepository::new(db_pool.clone());
    let department_repo = SqliteDepartmentRepository::new(db_pool.clone());
    let program_repo = SqliteProgramRepository::new(db_pool.clone());
    let module_repo = SqliteModuleRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());

    // Seed accounts
    println!("👥 Creating accounts...");

    let dean = account_repo.register(RegisterAccountRequest {
        last_name: "Admin".to_string(),
        first_name: "System".to_string(),
        email: "admin@faculty.com".to_string(),
        password: DEMO_PASSWORD.to_string(),
        phone: Some("0600000000".to_string()),
        city: Some("Campus".to_string()),
        address: Some("Administration Building".to_string()),
        role: Role::Dean,
    }).await?;
    account_repo.update_status(dean.id, AccountStatus::Active).await?;
    println!("  ✅ Created dean account (admin@faculty.com / {})", DEMO_PASSWORD);

    let prof = account_repo.register(RegisterAccountRequest {
        last_name: "Professor".to_string(),
        first_name: "Demo".to_string(),
        email: "prof@faculty.com".to_string(),
        password: DEMO_PASSWORD.to_string(),
        phone: Some("0611111111".to_string()),
        city: Some("Campus".to_string()),
        address: None,
        role: Role::Professor,
    }).await?;
    account_repo.update_status(prof.id, AccountStatus::Active).await?;
    println!("  ✅ Created professor account (prof@faculty.com / {})", DEMO_PASSWORD);

    let student = account_repo.register(RegisterAccountRequest {
        last_name: "Student".to_string(),
        first_name: "Demo".to_string(),
        email: "student@faculty.com".to_string(),
        password: DEMO_PASSWORD.to_string(),
        phone: Some("0622222222".to_string()),
        city: Some("City".to_string()),
        address: None,
        role: Role::Student,
    }).await?;
    account_repo.update_status(student.id, AccountStatus::Active).await?;
    println!("  ✅ Created student account (student@faculty.com / {})", DEMO_PASSWORD);

    // A few generated students left pending, for the approval screen
    for i in 0..5 {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let email = format!(
            "{}.{}{}@students.faculty.com",
            first.to_lowercase(),
            last.to_lowercase(),
            i
        );
        account_repo.register(RegisterAccountRequest {
            last_name: last,
            first_name: first,
            email,
            password: DEMO_PASSWORD.to_string(),
            phone: None,
            city: None,
            address: None,
            role: Role::Student,
        }).await?;
    }
    println!("  ✅ Created 5 pending student registrations");

    // Seed academic structure
    println!("🏛️  Creating academic structure...");

    department_repo.create(Department {
        code: "INFO".to_string(),
        name: "Computer Science".to_string(),
        created_on: Utc::now(),
    }).await?;

    department_repo.create(Department {
        code: "MATH".to_string(),
        name: "Mathematics".to_string(),
        created_on: Utc::now(),
    }).await?;

    program_repo.create(Program {
        code: "GL".to_string(),
        title: "Software Engineering".to_string(),
        level: "Master".to_string(),
        duration_years: 2,
        department_code: "INFO".to_string(),
    }).await?;

    program_repo.create(Program {
        code: "L-INFO".to_string(),
        title: "Computer Science Fundamentals".to_string(),
        level: "Licence".to_string(),
        duration_years: 3,
        department_code: "INFO".to_string(),
    }).await?;

    module_repo.create(CourseModule {
        id: Uuid::new_v4(),
        title: "Databases".to_string(),
        semester: 1,
        hours: 48,
        program_code: "GL".to_string(),
    }).await?;

    module_repo.create(CourseModule {
        id: Uuid::new_v4(),
        title: "Distributed Systems".to_string(),
        semester: 2,
        hours: 40,
        program_code: "GL".to_string(),
    }).await?;

    println!("  ✅ Created 2 departments, 2 programs, 2 modules");

    // A first announcement from the dean
    println!("📣 Creating welcome announcement...");

    let dean_person = person_repo
        .find_by_account_email("admin@faculty.com")
        .await?
        .ok_or_else(|| anyhow::anyhow!("dean person missing after seeding"))?;

    announcement_repo.create_with_document(
        NewAnnouncement {
            title: "Welcome to the new academic year".to_string(),
            body: "Courses start on Monday. Check your program page for schedules.".to_string(),
            importance: 2,
        },
        dean_person.id,
        None,
    ).await?;

    println!("  ✅ Created welcome announcement");
    println!("🎉 Seeding complete!");

    Ok(())
}
