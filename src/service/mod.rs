pub mod announcement_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;
use crate::uploads::UploadStore;

pub use announcement_service::{AnnouncementService, AttachmentUpload, CreateAnnouncementInput};

pub struct ServiceContext {
    pub person_repo: Arc<dyn PersonRepository>,
    pub account_repo: Arc<dyn AccountRepository>,
    pub department_repo: Arc<dyn DepartmentRepository>,
    pub program_repo: Arc<dyn ProgramRepository>,
    pub module_repo: Arc<dyn ModuleRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub alert_repo: Arc<dyn AlertRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub auth_service: Arc<AuthService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        person_repo: Arc<dyn PersonRepository>,
        account_repo: Arc<dyn AccountRepository>,
        department_repo: Arc<dyn DepartmentRepository>,
        program_repo: Arc<dyn ProgramRepository>,
        module_repo: Arc<dyn ModuleRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        alert_repo: Arc<dyn AlertRepository>,
        auth_service: Arc<AuthService>,
        uploads: UploadStore,
        db_pool: SqlitePool,
    ) -> Self {
        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo.clone(),
            person_repo.clone(),
            uploads,
        ));

        Self {
            person_repo,
            account_repo,
            department_repo,
            program_repo,
            module_repo,
            announcement_repo,
            alert_repo,
            announcement_service,
            auth_service,
            db_pool,
        }
    }
}
