//! Image upload service.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart;
use serde_json::Value;

use super::{
    envelope,
    error::{Error, Result},
    http::HttpClient,
};

/// Admin path for image uploads.
pub const UPLOAD_PATH: &str = "admin/images/upload/";

/// Image types Ghost accepts, by lowercase file extension.
pub const SUPPORTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
];

/// Infers the content type of an image from its file extension.
pub fn image_content_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            Error::UnsupportedMedia(format!("{} has no file extension", path.display()))
        })?;

    SUPPORTED_IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, content_type)| *content_type)
        .ok_or_else(|| {
            Error::UnsupportedMedia(format!(
                "{} (.{}); expected one of: {}",
                path.display(),
                ext,
                SUPPORTED_IMAGE_TYPES
                    .iter()
                    .map(|(e, _)| *e)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

/// Image upload service.
pub struct ImageService {
    http: Arc<HttpClient>,
}

impl ImageService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Uploads an image and returns its public URL.
    ///
    /// The content type is checked before the file is opened, so an
    /// unsupported type never reaches the network.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let url = client.images().upload("cover.png", Some("cover.png")).await?;
    /// println!("Uploaded to {}", url);
    /// ```
    pub async fn upload(&self, file_path: impl AsRef<Path>, reference: Option<&str>) -> Result<String> {
        let path = file_path.as_ref();
        let content_type = image_content_type(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::UnsupportedMedia(format!("invalid file name: {}", path.display())))?
            .to_string();

        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();

        let part = multipart::Part::stream_with_length(file, len)
            .file_name(filename)
            .mime_str(content_type)?;

        let mut form = multipart::Form::new().part("file", part);
        if let Some(reference) = reference {
            form = form.text("ref", reference.to_string());
        }

        let body = self.http.upload(UPLOAD_PATH, form).await?;
        let image = envelope::unwrap_one("images", body)?;

        image
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Envelope("uploaded image has no url".to_string()))
    }
}
