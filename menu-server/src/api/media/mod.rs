//! Media Routes
//!
//! Serves uploaded item images (public access).

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;

/// Image file response
enum MediaFileResponse {
    Ok(Bytes),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for MediaFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            MediaFileResponse::Ok(content) => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/jpeg"),
                    (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
                ],
                content,
            )
                .into_response(),
            MediaFileResponse::NotFound => (http::StatusCode::NOT_FOUND, "File not found").into_response(),
            MediaFileResponse::BadRequest(msg) => (http::StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

/// Reject anything that could escape the image directory
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
}

async fn serve_item_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> MediaFileResponse {
    if !is_safe_filename(&filename) {
        return MediaFileResponse::BadRequest("Invalid filename");
    }

    let file_path = state.item_image_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => MediaFileResponse::Ok(content.into()),
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Image not found");
            MediaFileResponse::NotFound
        }
    }
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/media/images/items/{filename}", get(serve_item_image))
}
