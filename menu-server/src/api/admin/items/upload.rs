//! Item Image Upload
//!
//! Accepts PNG / JPEG / WebP, re-encodes to JPEG and stores the file under
//! its content hash, so identical uploads share one file.

use std::io::Cursor;
use std::path::PathBuf;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use sha2::{Digest, Sha256};
use shared::models::{ITEM_IMAGE_DIR, Item};

use super::handler::{find_item, item_not_found};
use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::{RepoError, item};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Maximum file size (5MB)
pub(super) const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish images
const JPEG_QUALITY: u8 = 85;

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate size, extension and content
fn validate_image(data: &[u8], ext: &str) -> AppResult<()> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("max_bytes", MAX_FILE_SIZE as u64)
            .with_detail("size", data.len() as u64));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported file format '{}'. Supported: {}", ext_lower, SUPPORTED_FORMATS.join(", ")),
        ));
    }

    Ok(())
}

/// Decode and re-encode as JPEG
fn compress_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    Ok(buffer)
}

/// POST /api/admin/items/:id/image
pub async fn upload_image(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Item>>> {
    find_item(&state, id).await?;

    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid(format!("Invalid multipart request: {e}")))?
    {
        if field.name() == Some("file") {
            original_filename = field.file_name().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(|e| {
                AppError::invalid(format!("Multipart error: {e}"))
            })?;
            field_data = Some(bytes.to_vec());
            break;
        }
    }

    let data = field_data.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let filename = original_filename.unwrap_or_default();
    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Invalid file extension for: '{filename}'"),
            )
        })?;

    validate_image(&data, &ext)?;
    let compressed = tokio::task::spawn_blocking(move || compress_image(&data))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {e}")))??;

    let stored_name = format!("{}.jpg", calculate_hash(&compressed));
    let images_dir = state.item_image_dir();
    tokio::fs::create_dir_all(&images_dir)
        .await
        .map_err(|e| storage_failed(format!("Failed to create images directory: {e}")))?;

    let file_path = images_dir.join(&stored_name);
    if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
        tracing::debug!(file = %stored_name, "Image already stored");
    } else {
        tokio::fs::write(&file_path, &compressed)
            .await
            .map_err(|e| storage_failed(format!("Failed to save file: {e}")))?;
    }

    let relative = format!("{ITEM_IMAGE_DIR}/{stored_name}");
    let updated = item::set_image(state.pool(), id, Some(&relative))
        .await
        .map_err(|e| not_found_or(e, id))?;

    tracing::info!(
        item_id = id,
        original_name = %filename,
        size = compressed.len(),
        file = %stored_name,
        staff = %staff.username,
        "Item image uploaded"
    );

    Ok(ok(updated))
}

/// DELETE /api/admin/items/:id/image
///
/// The file stays on disk; other items may share it.
pub async fn clear_image(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let updated = item::set_image(state.pool(), id, None)
        .await
        .map_err(|e| not_found_or(e, id))?;
    Ok(ok(updated))
}

fn not_found_or(err: RepoError, id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => item_not_found(id),
        other => other.into(),
    }
}

fn storage_failed(msg: String) -> AppError {
    tracing::error!(error = %msg, "Image storage failed");
    AppError::with_message(ErrorCode::FileStorageFailed, msg)
}
