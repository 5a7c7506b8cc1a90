//! Collects a multipart body into a JSON part, files, and text fields.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::traits::UploadFile;

/// Parsed multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Raw JSON of the `request` part.
    request: Option<String>,
    /// File parts, in order.
    pub files: Vec<UploadFile>,
    /// Repeated `tags` text parts.
    pub tags: Vec<String>,
}

impl MultipartForm {
    /// Drain `multipart`. Parts named `file` or `files` become uploads.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "request" => {
                    form.request = Some(field.text().await.map_err(|e| {
                        AppError::validation(format!("Read error on 'request': {e}"))
                    })?);
                }
                "file" | "files" => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field.content_type().map(String::from);
                    let data = field.bytes().await.map_err(|e| {
                        AppError::validation(format!("Read error on '{name}': {e}"))
                    })?;
                    form.files.push(UploadFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                "tags" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::validation(format!("Read error on 'tags': {e}"))
                    })?;
                    form.tags.extend(split_tags(&text));
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// Decode the `request` part.
    pub fn request<T: DeserializeOwned>(&self) -> AppResult<T> {
        let raw = self
            .request
            .as_deref()
            .ok_or_else(|| AppError::validation("Missing 'request' part"))?;
        serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid 'request' part: {e}")))
    }

    /// The first non-empty file, if any.
    pub fn first_file(&self) -> Option<UploadFile> {
        self.files.iter().find(|f| !f.is_empty()).cloned()
    }
}

/// A `tags` part may carry a JSON array or a comma-separated list.
fn split_tags(text: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
        return list;
    }
    text.split(',').map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect()
}
