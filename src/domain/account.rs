use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login account linked one-to-one to a Person. The password hash never
/// lives on this struct; handlers that verify credentials fetch it with a
/// dedicated scalar query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub person_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Dean,
    Professor,
    Student,
    Administration,
}

impl Role {
    /// The one place role-to-destination dispatch lives. The login handler
    /// returns this path so clients never switch on role strings themselves.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Dean => "/dean/dashboard",
            Role::Administration => "/administration/dashboard",
            Role::Professor => "/professor/dashboard",
            Role::Student => "/student/dashboard",
        }
    }

    /// Roles allowed to manage academic structure (departments, programs,
    /// modules) and account approvals.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Dean | Role::Administration)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Pending,
    Suspended,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccountRequest {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub role: Role,
}
