use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Declared content types accepted for announcement attachments.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

/// Maximum attachment size (5 MiB)
pub const MAX_ATTACHMENT_SIZE: usize = 5 * 1024 * 1024;

/// Subdirectory of the public tree that holds promoted uploads; also the
/// prefix of every stored path handed back to clients.
const PUBLIC_SUBDIR: &str = "uploads";

/// Two-phase upload store. Files are first written to a staging directory;
/// only after the owning database transaction commits are they renamed into
/// the publicly served tree. A failed transaction discards the staged file,
/// so the public tree never contains attachments without a document row.
pub struct UploadStore {
    public_dir: PathBuf,
    staging_dir: PathBuf,
}

impl UploadStore {
    pub fn new(public_dir: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            staging_dir: staging_dir.into(),
        }
    }

    /// Checks the declared content type and size against the allow-list.
    /// Runs before any filesystem or database write.
    pub fn validate(content_type: &str, size: usize) -> Result<()> {
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Validation(format!(
                "Unsupported file type: {}",
                content_type
            )));
        }

        if size > MAX_ATTACHMENT_SIZE {
            return Err(AppError::Validation("File too large (max 5 MB)".to_string()));
        }

        Ok(())
    }

    /// Writes the bytes to the staging directory under a collision-free
    /// name. The returned handle knows where the file will live once
    /// promoted.
    pub async fn stage(&self, original_name: &str, data: &[u8]) -> Result<StagedUpload> {
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));

        fs::create_dir_all(&self.staging_dir).await.map_err(|e| {
            AppError::Internal(format!("Failed to create staging directory: {}", e))
        })?;

        let staged_path = self.staging_dir.join(&file_name);
        let mut file = fs::File::create(&staged_path).await.map_err(|e| {
            AppError::Internal(format!("Failed to create staged file: {}", e))
        })?;

        file.write_all(data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write staged file: {}", e))
        })?;

        Ok(StagedUpload {
            staged_path,
            final_path: self.public_dir.join(PUBLIC_SUBDIR).join(&file_name),
            public_path: format!("{}/{}", PUBLIC_SUBDIR, file_name),
        })
    }
}

pub struct StagedUpload {
    staged_path: PathBuf,
    final_path: PathBuf,
    public_path: String,
}

impl StagedUpload {
    /// The public-relative path stored in the document row, e.g.
    /// "uploads/7f3a...-notes.pdf".
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Moves the staged file into the public tree. Called after the owning
    /// transaction has committed.
    pub async fn promote(self) -> Result<()> {
        if let Some(parent) = self.final_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Internal(format!("Failed to create uploads directory: {}", e))
            })?;
        }

        fs::rename(&self.staged_path, &self.final_path).await.map_err(|e| {
            AppError::Internal(format!("Failed to promote staged file: {}", e))
        })
    }

    /// Removes the staged file after a failed transaction. Best effort; a
    /// leftover staging entry is harmless and never publicly visible.
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.staged_path).await {
            tracing::warn!("Failed to remove staged file {:?}: {}", self.staged_path, e);
        }
    }
}

/// Strips any path components from a client-supplied filename.
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_file_name("exam schedule.docx"), "exam_schedule.docx");
        assert_eq!(sanitize_file_name(""), "attachment");
    }

    #[test]
    fn validate_rejects_disallowed_types() {
        assert!(UploadStore::validate("application/pdf", 1024).is_ok());
        assert!(UploadStore::validate("application/zip", 1024).is_err());
        assert!(UploadStore::validate("text/html", 10).is_err());
    }

    #[test]
    fn validate_rejects_oversized_files() {
        assert!(UploadStore::validate("image/png", MAX_ATTACHMENT_SIZE).is_ok());
        assert!(UploadStore::validate("image/png", MAX_ATTACHMENT_SIZE + 1).is_err());
    }
}
