/**
 * Upload Routes
 * Multipart image upload backing the dual-source media fields. The stored
 * path (relative to the uploads root) is what project/section/blog records
 * reference; the file itself is served statically under /uploads.
 */
use axum::{
    extract::{Multipart, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::media::request_base_url;

const UPLOAD_ROOT: &str = "uploads";
const MEDIA_DIR: &str = "media";
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Absolute URL for immediate display.
    pub url: String,
    /// Path relative to the uploads root; store this in media fields.
    pub path: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageInfo>,
    pub total: usize,
}

fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn get_extension_from_mime(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn sanitize_filename(filename: &str) -> bool {
    // Reject path traversal and special characters
    !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

/// POST /api/upload/image - Store an uploaded image under the uploads root
pub async fn upload_image(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let base_url = request_base_url(&headers);

    let upload_path = PathBuf::from(UPLOAD_ROOT).join(MEDIA_DIR);
    if let Err(e) = tokio::fs::create_dir_all(&upload_path).await {
        tracing::error!("Failed to create upload directory: {}", e);
        return Err(ApiError::Unavailable);
    }

    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Err(ApiError::invalid("file", "no file provided")),
        Err(e) => {
            tracing::error!("Multipart error: {}", e);
            return Err(ApiError::invalid("file", "invalid multipart data"));
        }
    };

    let original_name = field.file_name().unwrap_or("unknown").to_string();
    let original_ext = original_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&original_ext.as_str()) {
        return Err(ApiError::invalid(
            "file",
            "unsupported file type; allowed: JPEG, PNG, WebP, GIF",
        ));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|_| ApiError::invalid("file", "failed to read file data"))?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::invalid("file", "file too large; maximum size is 5MB"));
    }
    if bytes.is_empty() {
        return Err(ApiError::invalid("file", "empty file"));
    }

    let mime_type = validate_image_magic_bytes(&bytes).ok_or_else(|| {
        ApiError::invalid("file", "file content does not match an allowed image type")
    })?;

    let ext = get_extension_from_mime(mime_type);
    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = upload_path.join(&filename);

    if let Err(e) = tokio::fs::write(&file_path, &bytes).await {
        tracing::error!("Failed to write upload file: {}", e);
        return Err(ApiError::Unavailable);
    }

    let path = format!("{}/{}", MEDIA_DIR, filename);
    tracing::info!("Image uploaded: {} ({} bytes)", filename, bytes.len());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: format!("{}/uploads/{}", base_url, path),
            path,
            filename,
            size: bytes.len(),
            mime_type: mime_type.to_string(),
        }),
    ))
}

/// DELETE /api/upload/images/:filename - Remove an uploaded image
pub async fn delete_image(Path(filename): Path<String>) -> ApiResult<impl IntoResponse> {
    if !sanitize_filename(&filename) {
        return Err(ApiError::invalid("filename", "invalid filename"));
    }

    let file_path = PathBuf::from(UPLOAD_ROOT).join(MEDIA_DIR).join(&filename);

    if !file_path.exists() {
        return Err(ApiError::NotFound("file"));
    }

    if let Err(e) = tokio::fs::remove_file(&file_path).await {
        tracing::error!("Failed to delete file {}: {}", filename, e);
        return Err(ApiError::Unavailable);
    }

    tracing::info!("Image deleted: {}", filename);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/upload/images - List uploaded images, newest first
pub async fn list_images() -> ApiResult<Json<ImageListResponse>> {
    let upload_path = PathBuf::from(UPLOAD_ROOT).join(MEDIA_DIR);
    if !upload_path.exists() {
        return Ok(Json(ImageListResponse {
            images: vec![],
            total: 0,
        }));
    }

    let mut images = Vec::new();

    let mut entries = match tokio::fs::read_dir(&upload_path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read upload directory: {}", e);
            return Err(ApiError::Unavailable);
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(_) => continue,
        };

        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(|t| {
                let dt: chrono::DateTime<chrono::Utc> = t.into();
                dt.to_rfc3339()
            })
            .unwrap_or_default();

        images.push(ImageInfo {
            path: format!("{}/{}", MEDIA_DIR, filename),
            filename,
            size: metadata.len(),
            created_at,
        });
    }

    // Sort by created_at descending
    images.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = images.len();
    Ok(Json(ImageListResponse { images, total }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_byte_detection() {
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(
            validate_image_magic_bytes(&[0x89, 0x50, 0x4E, 0x47]),
            Some("image/png")
        );
        assert_eq!(validate_image_magic_bytes(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(validate_image_magic_bytes(&[0xFF]), None);
    }

    #[test]
    fn test_filename_sanitization() {
        assert!(sanitize_filename("photo.png"));
        assert!(!sanitize_filename("../etc/passwd"));
        assert!(!sanitize_filename("a/b.png"));
        assert!(!sanitize_filename("a\\b.png"));
    }

    #[test]
    fn test_extension_from_mime() {
        assert_eq!(get_extension_from_mime("image/webp"), "webp");
        assert_eq!(get_extension_from_mime("application/pdf"), "bin");
    }
}
