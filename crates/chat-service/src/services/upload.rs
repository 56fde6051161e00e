//! Media uploads to local disk
//!
//! Files are stored flat under the configured upload directory with a random
//! name and served back at `/uploads/<file>`.

use chat_common::AppError;
use chat_core::{DomainError, MediaType};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::UploadResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Public path prefix for stored uploads
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Upload service
pub struct UploadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UploadService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store an `image/*` or `video/*` body and return its URL
    #[instrument(skip(self, body), fields(size = body.len()))]
    pub async fn store(&self, content_type: &str, body: &[u8]) -> ServiceResult<UploadResponse> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let media_type = MediaType::from_mime(&mime)
            .ok_or_else(|| DomainError::InvalidMediaType(mime.clone()))?;

        let max_bytes = self.ctx.settings().max_upload_bytes;
        if body.len() > max_bytes {
            return Err(AppError::PayloadTooLarge { max_bytes }.into());
        }
        if body.is_empty() {
            return Err(ServiceError::validation("upload body is empty"));
        }

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension_for(&mime));
        let dir = &self.ctx.settings().upload_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ServiceError::internal(format!("create upload dir: {e}")))?;
        tokio::fs::write(dir.join(&file_name), body)
            .await
            .map_err(|e| ServiceError::internal(format!("write upload: {e}")))?;

        info!(file = %file_name, media_type = media_type.as_str(), "Upload stored");

        Ok(UploadResponse {
            url: format!("{UPLOAD_URL_PREFIX}/{file_name}"),
            media_type,
            size: body.len(),
        })
    }
}

/// File extension for a media MIME type; unknown subtypes get `bin`
fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "video/ogg" => "ogv",
        _ => "bin",
    }
}
