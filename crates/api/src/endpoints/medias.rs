//! Media upload endpoint.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use microblog_common::{AppError, AppResult};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const FILE_UPLOAD_ERROR: &str = "FileUploadError";

/// Uploaded media response.
#[derive(Serialize)]
pub struct UploadedMedia {
    /// ID to reference from a new tweet.
    pub media_id: i32,
}

/// Upload a file from the `file` multipart field.
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResponse<UploadedMedia> {
    let (file_name, data) = match read_file_field(multipart).await {
        Ok(file) => file,
        Err(e) => return ApiResponse::from_error(FILE_UPLOAD_ERROR, &e),
    };

    match state
        .media_service
        .upload(file_name.as_deref(), &data)
        .await
    {
        Ok(media_id) => {
            tracing::info!(user_id = user.id, media_id, "Media uploaded");
            ApiResponse::ok(UploadedMedia { media_id })
        }
        Err(e) => ApiResponse::from_error(FILE_UPLOAD_ERROR, &e),
    }
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<(Option<String>, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(ToString::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            return Ok((file_name, data.to_vec()));
        }
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

/// Media routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload))
}
