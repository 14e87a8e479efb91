//! `POST /api/uploads`: multipart file storage under the static root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State,
        multipart::{Field, Multipart, MultipartRejection},
    },
};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};
use trellis_api_models::{ErrorBody, UploadResponse, UploadedFile};
use uuid::Uuid;

use crate::http::constants::{MSG_FILE_TOO_LARGE, MSG_NO_FILES};
use crate::http::errors::ApiError;
use crate::openapi::UploadForm;
use crate::state::ApiState;

const MAX_NAME_CHARS: usize = 120;
const FALLBACK_NAME: &str = "file";

#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    security(("bearer" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files stored", body = UploadResponse),
        (status = 400, description = "No file parts or malformed body", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 413, description = "A part exceeds the body limit", body = ErrorBody)
    )
)]
pub(crate) async fn upload_files(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;
    let settings = &state.uploads;
    fs::create_dir_all(&settings.dir).await?;

    let mut files = Vec::new();
    let mut stored: Vec<PathBuf> = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                discard(&stored).await;
                return Err(err.into());
            }
        };
        // Plain form values carry no file name.
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&original_name));
        let path = settings.dir.join(&file_name);

        stored.push(path.clone());
        let size = match store_field(field, &path, settings.max_file_bytes).await {
            Ok(size) => size,
            Err(err) => {
                discard(&stored).await;
                return Err(err);
            }
        };

        state.metrics.record_upload(size);
        info!(file_name = %file_name, size, "upload stored");
        files.push(UploadedFile {
            field_name,
            original_name,
            url: format!("{}/{}", settings.url_prefix, file_name),
            file_name,
            size,
            content_type,
        });
    }

    if files.is_empty() {
        return Err(ApiError::bad_request(MSG_NO_FILES));
    }
    Ok(Json(UploadResponse { files }))
}

async fn store_field(mut field: Field<'_>, path: &Path, limit: u64) -> Result<u64, ApiError> {
    let mut file = fs::File::create(path).await?;
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        if size > limit {
            return Err(ApiError::payload_too_large(MSG_FILE_TOO_LARGE));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(size)
}

async fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %err, "failed to remove partial upload");
        }
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`, dropping any
/// directory part and leading dots.
pub(crate) fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_safe_names() {
        assert_eq!(sanitize_file_name("report-2024_v1.pdf"), "report-2024_v1.pdf");
    }

    #[test]
    fn strips_directories_and_unsafe_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\ada\\my photo.png"), "my_photo.png");
        assert_eq!(sanitize_file_name("résumé.txt"), "r_sum_.txt");
    }

    #[test]
    fn hidden_and_empty_names_fall_back() {
        assert_eq!(sanitize_file_name(".env"), "env");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name("uploads/"), "file");
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_file_name(&long).len(), MAX_NAME_CHARS);
    }
}
