//! Local file storage for uploads.
//!
//! Files land under `<upload_dir>/<kind dir>/` and are served back from
//! `/uploads/...` by the router.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::{MAX_UPLOAD_BYTES, UPLOAD_URL_PREFIX};
use crate::errors::{AppError, AppResult};

const IMAGE_TYPES: &[(&str, &[&str])] = &[
    ("jpeg", &["image/jpeg"]),
    ("jpg", &["image/jpeg", "image/jpg"]),
    ("png", &["image/png"]),
    ("gif", &["image/gif"]),
    ("webp", &["image/webp"]),
];

const DOCUMENT_TYPES: &[(&str, &[&str])] = &[
    ("pdf", &["application/pdf"]),
    ("doc", &["application/msword"]),
    (
        "docx",
        &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
    ),
];

/// What an upload is for; decides directory, file prefix and allowed types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProfilePicture,
    Resume,
    /// Resume or cover letter attached to an application
    ApplicationDocument,
    CompanyLogo,
}

impl UploadKind {
    pub fn directory(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profiles",
            UploadKind::Resume => "cvs",
            UploadKind::ApplicationDocument => "applications",
            UploadKind::CompanyLogo => "logos",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profile",
            UploadKind::Resume => "cv",
            UploadKind::ApplicationDocument => "app",
            UploadKind::CompanyLogo => "logo",
        }
    }

    fn allowed(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            UploadKind::ProfilePicture | UploadKind::CompanyLogo => IMAGE_TYPES,
            UploadKind::Resume | UploadKind::ApplicationDocument => DOCUMENT_TYPES,
        }
    }

    /// Validate size, extension and MIME type. Returns the lower-cased extension.
    pub fn check(&self, file: &UploadedFile) -> AppResult<String> {
        if file.bytes.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {} MB",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let extension = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content_type = file.content_type.to_ascii_lowercase();

        let accepted = self
            .allowed()
            .iter()
            .any(|(ext, mimes)| *ext == extension && mimes.contains(&content_type.as_str()));

        if !accepted {
            let names: Vec<&str> = self.allowed().iter().map(|(ext, _)| *ext).collect();
            return Err(AppError::validation(format!(
                "Invalid file type. Allowed: {}",
                names.join(", ")
            )));
        }
        Ok(extension)
    }
}

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store the file and return its public URL path.
    async fn store(&self, kind: UploadKind, owner: Uuid, file: UploadedFile) -> AppResult<String>;

    /// Delete a previously stored file. Missing files are ignored.
    async fn remove(&self, url: &str) -> AppResult<()>;
}

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a public URL back onto the upload directory, refusing anything
    /// that would escape it.
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(UPLOAD_URL_PREFIX)?.trim_start_matches('/');
        let mut parts = relative.split('/');
        let (dir, name) = (parts.next()?, parts.next()?);
        if parts.next().is_some() || name.is_empty() || dir.contains("..") || name.contains("..") {
            return None;
        }
        Some(self.root.join(dir).join(name))
    }
}

fn unique_suffix() -> String {
    let random: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}", Utc::now().timestamp_millis(), random)
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, kind: UploadKind, owner: Uuid, file: UploadedFile) -> AppResult<String> {
        let extension = kind.check(&file)?;
        let name = format!("{}-{}-{}.{}", kind.prefix(), owner, unique_suffix(), extension);

        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Cannot create upload directory: {}", e)))?;
        tokio::fs::write(dir.join(&name), &file.bytes)
            .await
            .map_err(|e| AppError::internal(format!("Cannot write upload: {}", e)))?;

        tracing::debug!(kind = ?kind, owner = %owner, file = %name, "Stored upload");
        Ok(format!("{}/{}/{}", UPLOAD_URL_PREFIX, kind.directory(), name))
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        let Some(path) = self.path_for(url) else {
            tracing::warn!(url = %url, "Ignoring removal of a path outside the upload directory");
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Cannot remove upload: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![1; size],
        }
    }

    #[test]
    fn test_extension_and_mime_must_both_match() {
        let kind = UploadKind::Resume;
        assert_eq!(kind.check(&file("cv.PDF", "application/pdf", 10)).unwrap(), "pdf");
        assert!(kind.check(&file("cv.pdf", "image/png", 10)).is_err());
        assert!(kind.check(&file("cv.png", "image/png", 10)).is_err());
        assert!(UploadKind::ProfilePicture
            .check(&file("me.png", "image/png", 10))
            .is_ok());
    }

    #[test]
    fn test_size_ceiling() {
        let kind = UploadKind::CompanyLogo;
        assert!(kind.check(&file("logo.png", "image/png", MAX_UPLOAD_BYTES)).is_ok());
        assert!(kind
            .check(&file("logo.png", "image/png", MAX_UPLOAD_BYTES + 1))
            .is_err());
        assert!(kind.check(&file("logo.png", "image/png", 0)).is_err());
    }

    #[test]
    fn test_path_for_stays_inside_root() {
        let storage = LocalFileStorage::new("/srv/uploads");
        assert_eq!(
            storage.path_for("/uploads/cvs/cv-1.pdf"),
            Some(PathBuf::from("/srv/uploads/cvs/cv-1.pdf"))
        );
        assert_eq!(storage.path_for("/uploads/../etc/passwd"), None);
        assert_eq!(storage.path_for("/static/cv.pdf"), None);
    }

    #[tokio::test]
    async fn test_store_and_remove_round_trip() {
        let root = std::env::temp_dir().join(format!("skillbridge-{}", Uuid::new_v4()));
        let storage = LocalFileStorage::new(&root);
        let owner = Uuid::new_v4();

        let url = storage
            .store(UploadKind::Resume, owner, file("cv.pdf", "application/pdf", 16))
            .await
            .unwrap();
        assert!(url.starts_with(&format!("/uploads/cvs/cv-{}-", owner)));
        assert!(url.ends_with(".pdf"));

        let path = storage.path_for(&url).unwrap();
        assert!(path.exists());
        storage.remove(&url).await.unwrap();
        assert!(!path.exists());
        storage.remove(&url).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }
}
