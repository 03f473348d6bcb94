use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub code: String,
    pub name: String,
    pub created_on: DateTime<Utc>,
}

/// A program of study (filiere) offered by a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub code: String,
    pub title: String,
    pub level: String,
    pub duration_years: i64,
    pub department_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Uuid,
    pub title: String,
    pub semester: i64,
    pub hours: i64,
    pub program_code: String,
}
