//! Multipart form extractor - Collects text fields and file parts.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use std::collections::HashMap;

use crate::errors::AppError;
use crate::infra::UploadedFile;

/// A fully buffered multipart form.
///
/// Size limits are enforced by the router's body limit and by
/// `UploadKind::check` when a file is stored.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Remove and return the file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// The file sent under `name`, or a validation error naming the field.
    pub fn require_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.take_file(name)
            .ok_or_else(|| AppError::validation(format!("No file uploaded in field '{}'", name)))
    }

    /// `true`, `1` and `on` count as set.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), Some("true" | "1" | "on"))
    }
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const BOUNDARY: &str = "XBOUNDARYX";

    fn request(body: String) -> Request {
        Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_collects_fields_and_files() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"jobPostId\"\r\n\r\nabc\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"useProfileResume\"\r\n\r\ntrue\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n--{b}--\r\n",
            b = BOUNDARY
        );

        let mut form = UploadForm::from_request(request(body), &()).await.unwrap();
        assert_eq!(form.text("jobPostId"), Some("abc"));
        assert!(form.flag("useProfileResume"));
        let resume = form.take_file("resume").unwrap();
        assert_eq!(resume.file_name, "cv.pdf");
        assert_eq!(resume.content_type, "application/pdf");
        assert_eq!(resume.bytes, b"%PDF-1.4");
        assert!(form.require_file("coverLetter").is_err());
    }
}
