use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::error::AppError;
use crate::ingest::{run_upload_job, UploadJob};
use crate::progress::ProgressRegistry;
use crate::tasks::spawn_detached;

/// Content types accepted for catalog uploads
const ALLOWED_CONTENT_TYPES: [&str; 3] = [
    "application/gzip",
    "application/x-gzip",
    "application/octet-stream",
];

/// Multipart field carrying the catalog
const FILE_FIELD: &str = "file";

/// Upload size cap; compressed catalogs stay well under this
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

#[derive(Clone)]
pub struct UploadsState {
    pub db: PgPool,
    pub progress: Arc<ProgressRegistry>,
    pub ingest: IngestConfig,
}

pub fn uploads_routes() -> Router<UploadsState> {
    Router::new()
        .route("/", post(upload_catalog))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Accept a gzip-compressed CSV and begin background processing.
///
/// Only obviously malformed requests are rejected here (bad content type,
/// missing filename); everything content-level is reported through the
/// progress channel for the returned job id.
#[tracing::instrument(skip(state, multipart))]
async fn upload_catalog(
    State(state): State<UploadsState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(FILE_FIELD) {
            return stage_and_schedule(&state, field).await;
        }
    }

    Err(AppError::BadRequest("Multipart field 'file' is required".to_string()))
}

async fn stage_and_schedule(
    state: &UploadsState,
    mut field: axum::extract::multipart::Field<'_>,
) -> Result<Response, AppError> {
    let content_type = field.content_type().map(str::to_string);
    if !content_type
        .as_deref()
        .is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct))
    {
        tracing::warn!(content_type = ?content_type, "upload rejected: invalid content type");
        return Err(AppError::BadRequest(format!(
            "Upload must be gzip-compressed CSV. Supported content types: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }

    let filename = field
        .file_name()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!("upload rejected: missing filename");
            AppError::BadRequest("Filename is required".to_string())
        })?;

    let job_id = Uuid::new_v4().simple().to_string();
    let file_path = state.ingest.upload_dir.join(format!("upload-{job_id}.gz"));

    let mut file = tokio::fs::File::create(&file_path).await?;
    let mut bytes_written: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
    {
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await?;

    tracing::info!(
        job_id = %job_id,
        filename = %filename,
        bytes = bytes_written,
        path = %file_path.display(),
        "upload staged, scheduling ingestion"
    );

    let job = UploadJob {
        job_id: job_id.clone(),
        file_path,
        batch_size: state.ingest.batch_size,
    };
    spawn_detached(
        "upload-pipeline",
        run_upload_job(job, state.db.clone(), state.progress.clone()),
    );

    Ok((StatusCode::ACCEPTED, Json(json!({ "job_id": job_id }))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_content_types_cover_gzip_variants() {
        assert!(ALLOWED_CONTENT_TYPES.contains(&"application/gzip"));
        assert!(ALLOWED_CONTENT_TYPES.contains(&"application/x-gzip"));
        assert!(ALLOWED_CONTENT_TYPES.contains(&"application/octet-stream"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"text/csv"));
    }

    #[test]
    fn test_routes_structure() {
        let router = uploads_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
