use std::sync::Arc;

use crate::{
    domain::{AnnouncementQuery, AnnouncementRecord, NewAnnouncement, NewDocument},
    error::{AppError, Result},
    repository::{AnnouncementRepository, PersonRepository},
    uploads::UploadStore,
};

/// Document type tag for attachments created through this workflow.
const ANNOUNCEMENT_DOC_TYPE: &str = "Annonce";
const INITIAL_DOC_VERSION: &str = "1.0";
const DEFAULT_CONFIDENTIALITY: i64 = 1;

#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CreateAnnouncementInput {
    pub title: String,
    pub content: String,
    pub importance: i64,
    pub attachment: Option<AttachmentUpload>,
}

/// Orchestrates the announcement creation workflow: validate, resolve the
/// author, stage the attachment, run the multi-table transaction, then
/// promote the staged file into the public tree.
pub struct AnnouncementService {
    announcement_repo: Arc<dyn AnnouncementRepository>,
    person_repo: Arc<dyn PersonRepository>,
    uploads: UploadStore,
}

impl AnnouncementService {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        person_repo: Arc<dyn PersonRepository>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            announcement_repo,
            person_repo,
            uploads,
        }
    }

    /// Creates an announcement attributed to the person behind
    /// `author_email` (the authenticated account's email). With an
    /// attachment, a document row and its author link are created in the
    /// same transaction; without one, no document is touched.
    pub async fn create(
        &self,
        author_email: &str,
        input: CreateAnnouncementInput,
    ) -> Result<AnnouncementRecord> {
        // All validation runs before any filesystem or database write.
        if input.title.trim().is_empty() || input.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        if let Some(attachment) = &input.attachment {
            UploadStore::validate(&attachment.content_type, attachment.data.len())?;
        }

        let person = self
            .person_repo
            .find_by_account_email(author_email)
            .await?
            .ok_or_else(|| AppError::NotFound("No person linked to this account".to_string()))?;

        let staged = match &input.attachment {
            Some(attachment) => Some(
                self.uploads
                    .stage(&attachment.file_name, &attachment.data)
                    .await?,
            ),
            None => None,
        };

        let document = staged.as_ref().map(|staged| NewDocument {
            title: input.title.clone(),
            doc_type: ANNOUNCEMENT_DOC_TYPE.to_string(),
            storage_path: staged.public_path().to_string(),
            version: INITIAL_DOC_VERSION.to_string(),
            confidentiality: DEFAULT_CONFIDENTIALITY,
        });

        let announcement = NewAnnouncement {
            title: input.title,
            body: input.content,
            importance: input.importance,
        };

        let record = match self
            .announcement_repo
            .create_with_document(announcement, person.id, document)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                // Nothing committed; the staged file must not survive.
                if let Some(staged) = staged {
                    staged.discard().await;
                }
                return Err(e);
            }
        };

        if let Some(staged) = staged {
            staged.promote().await?;
        }

        Ok(record)
    }

    pub async fn list(&self, query: AnnouncementQuery) -> Result<Vec<AnnouncementRecord>> {
        self.announcement_repo.list(query).await
    }
}
