use axum::{
    extract::{Multipart, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{
        AnnouncementAuthor, AnnouncementQuery, AnnouncementRecord, AnnouncementSortField,
        Document, Person, SortDirection,
    },
    error::{AppError, Result},
    service::{AttachmentUpload, CreateAnnouncementInput},
};

// Response DTOs keep the wire names of the legacy portal API so existing
// frontends keep working against this backend.

#[derive(Debug, Serialize)]
pub struct PersonPayload {
    pub idp: Uuid,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub tele: Option<String>,
    pub ville: Option<String>,
    pub adr: Option<String>,
    pub date_nai: Option<DateTime<Utc>>,
}

impl From<Person> for PersonPayload {
    fn from(person: Person) -> Self {
        Self {
            idp: person.id,
            nom: person.last_name,
            prenom: person.first_name,
            email: person.email,
            tele: person.phone,
            ville: person.city,
            adr: person.address,
            date_nai: person.birth_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorLinkPayload {
    pub date_proposition: DateTime<Utc>,
    pub personnes: PersonPayload,
}

impl From<AnnouncementAuthor> for AuthorLinkPayload {
    fn from(author: AnnouncementAuthor) -> Self {
        Self {
            date_proposition: author.proposed_at,
            personnes: author.person.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentPayload {
    pub idd: Uuid,
    pub titre: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub chemin: String,
    pub date_creat: DateTime<Utc>,
    pub version: String,
    pub niveau_confid: i64,
}

impl From<Document> for DocumentPayload {
    fn from(document: Document) -> Self {
        Self {
            idd: document.id,
            titre: document.title,
            doc_type: document.doc_type,
            chemin: document.storage_path,
            date_creat: document.created_at,
            version: document.version,
            niveau_confid: document.confidentiality,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementPayload {
    pub ida: Uuid,
    pub titre: String,
    pub contenu: String,
    pub date_pub: DateTime<Utc>,
    pub deg_imp: i64,
    pub personne_annonce: Vec<AuthorLinkPayload>,
    pub document: Option<DocumentPayload>,
}

impl From<AnnouncementRecord> for AnnouncementPayload {
    fn from(record: AnnouncementRecord) -> Self {
        Self {
            ida: record.announcement.id,
            titre: record.announcement.title,
            contenu: record.announcement.body,
            date_pub: record.announcement.published_at,
            deg_imp: record.announcement.importance,
            personne_annonce: record.authors.into_iter().map(Into::into).collect(),
            document: record.document.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub limit: Option<i64>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    pub order: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
) -> Result<Json<Vec<AnnouncementPayload>>> {
    let query = AnnouncementQuery {
        limit: params.limit,
        order_by: params
            .order_by
            .as_deref()
            .map(AnnouncementSortField::parse)
            .unwrap_or(AnnouncementSortField::PublishedAt),
        direction: params
            .order
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or(SortDirection::Desc),
    };

    let records = state.service_context.announcement_service.list(query).await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct CreateAnnouncementResponse {
    pub message: String,
    pub data: AnnouncementPayload,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<CreateAnnouncementResponse>> {
    let input = read_multipart(multipart).await?;

    let record = state
        .service_context
        .announcement_service
        .create(&user.account.email, input)
        .await?;

    Ok(Json(CreateAnnouncementResponse {
        message: "Announcement created".to_string(),
        data: record.into(),
    }))
}

/// Pulls the form fields out of the multipart body. Field-level validation
/// happens in the service; this only shapes the input.
async fn read_multipart(mut multipart: Multipart) -> Result<CreateAnnouncementInput> {
    let mut title = String::new();
    let mut content = String::new();
    let mut importance: i64 = 1;
    let mut attachment: Option<AttachmentUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("title") => {
                title = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("content") => {
                content = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("importance") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Absent or unparsable importance falls back to 1.
                importance = raw.trim().parse().unwrap_or(1);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                // An empty file part means no attachment was chosen.
                if !data.is_empty() {
                    attachment = Some(AttachmentUpload {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(CreateAnnouncementInput {
        title,
        content,
        importance,
        attachment,
    })
}
