use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod account_repository;
pub mod alert_repository;
pub mod announcement_repository;
pub mod department_repository;
pub mod module_repository;
pub mod person_repository;
pub mod program_repository;

pub use account_repository::SqliteAccountRepository;
pub use alert_repository::SqliteAlertRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use department_repository::SqliteDepartmentRepository;
pub use module_repository::SqliteModuleRepository;
pub use person_repository::SqlitePersonRepository;
pub use program_repository::SqliteProgramRepository;

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn create(&self, person: CreatePersonRequest) -> Result<Person>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Person>>;
    /// Resolves the Person linked to the account that owns `email`. This is
    /// the join the announcement workflow uses to attribute authorship.
    async fn find_by_account_email(&self, email: &str) -> Result<Option<Person>>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Creates the Person and its Account in one transaction. The account
    /// starts out `pending`; an approval flips it to `active`.
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn list_pending(&self) -> Result<Vec<Account>>;
    async fn update_status(&self, id: Uuid, status: AccountStatus) -> Result<Account>;
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn create(&self, department: Department) -> Result<Department>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Department>>;
    async fn list(&self) -> Result<Vec<Department>>;
    async fn update_name(&self, code: &str, name: &str) -> Result<Department>;
    async fn delete(&self, code: &str) -> Result<()>;
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, program: Program) -> Result<Program>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Program>>;
    async fn list(&self) -> Result<Vec<Program>>;
    async fn list_by_department(&self, department_code: &str) -> Result<Vec<Program>>;
    async fn update(&self, code: &str, program: Program) -> Result<Program>;
    async fn delete(&self, code: &str) -> Result<()>;
}

#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn create(&self, module: CourseModule) -> Result<CourseModule>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseModule>>;
    async fn list_by_program(&self, program_code: &str) -> Result<Vec<CourseModule>>;
    async fn update(&self, id: Uuid, module: CourseModule) -> Result<CourseModule>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// The core write path: announcement + author link, and when a document
    /// is supplied, document + document author link, all in one transaction.
    /// Either everything lands or nothing does.
    async fn create_with_document(
        &self,
        announcement: NewAnnouncement,
        author_id: Uuid,
        document: Option<NewDocument>,
    ) -> Result<AnnouncementRecord>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementRecord>>;
    async fn list(&self, query: AnnouncementQuery) -> Result<Vec<AnnouncementRecord>>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn create(&self, alert: NewAlert) -> Result<Alert>;
    async fn list_with_users(&self) -> Result<Vec<AlertWithUser>>;
    async fn update(&self, id: Uuid, title: &str, description: &str, alert_type: AlertType) -> Result<()>;
    /// Deleting an id that does not exist is a store-level error, surfaced
    /// to the caller as a 500.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
