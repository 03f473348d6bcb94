use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Person;

/// A published notice. The publication timestamp is set at creation and
/// never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
    pub importance: i64,
    pub created_at: DateTime<Utc>,
}

/// Join record tying an announcement to the person who proposed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementAuthor {
    pub proposed_at: DateTime<Utc>,
    pub person: Person,
}

/// Stored metadata for an uploaded file. A document of type "Annonce"
/// exists only when its announcement was created with an attachment; the
/// link back is an explicit foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub doc_type: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
    pub version: String,
    pub confidentiality: i64,
    pub announcement_id: Option<Uuid>,
}

/// An announcement hydrated with its author links and attached document,
/// as the listing and creation endpoints return it.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementRecord {
    pub announcement: Announcement,
    pub authors: Vec<AnnouncementAuthor>,
    pub document: Option<Document>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    pub importance: i64,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub doc_type: String,
    pub storage_path: String,
    pub version: String,
    pub confidentiality: i64,
}

/// Sort parameters for the announcement listing. Field names mirror the
/// wire-level `orderBy` values; anything unrecognized falls back to the
/// publication date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementSortField {
    PublishedAt,
    Title,
    Importance,
}

impl AnnouncementSortField {
    pub fn parse(s: &str) -> Self {
        match s {
            "titre" => AnnouncementSortField::Title,
            "deg_imp" => AnnouncementSortField::Importance,
            _ => AnnouncementSortField::PublishedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnnouncementQuery {
    pub limit: Option<i64>,
    pub order_by: AnnouncementSortField,
    pub direction: SortDirection,
}

impl Default for AnnouncementQuery {
    fn default() -> Self {
        Self {
            limit: None,
            order_by: AnnouncementSortField::PublishedAt,
            direction: SortDirection::Desc,
        }
    }
}
