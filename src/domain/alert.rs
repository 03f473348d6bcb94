use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Account;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub alert_type: AlertType,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Error,
    Warning,
    Info,
}

impl AlertType {
    /// Wire values are checked against this allow-list before any write;
    /// anything else is a 400, not a deserialization failure.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(AlertType::Error),
            "warning" => Some(AlertType::Warning),
            "info" => Some(AlertType::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Error => "error",
            AlertType::Warning => "warning",
            AlertType::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub title: String,
    pub description: String,
    pub alert_type: AlertType,
    pub account_id: Uuid,
}

/// An alert hydrated with the account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AlertWithUser {
    pub alert: Alert,
    pub user: Account,
}
