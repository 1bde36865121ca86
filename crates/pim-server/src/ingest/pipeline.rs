//! Upload job orchestration
//!
//! One pipeline run per accepted upload, executed as a detached task:
//!
//! 1. verify the staged artifact exists
//! 2. counting pass — decode once, count normalizable rows, fix `total`
//! 3. processing pass — decode again, batch and upsert, report progress
//! 4. exactly one terminal `complete` or `error` message
//! 5. delete the staged artifact on every exit path
//!
//! Decoding runs on the blocking pool and feeds the async consumer through a
//! bounded channel, so memory use is bounded by the batch and channel sizes,
//! not the file size. Batches commit independently: a failure mid-job leaves
//! earlier batches persisted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::progress::{ProgressMessage, ProgressRegistry};

use super::batch::upsert_batch;
use super::decoder::{CatalogDecoder, RawRow};
use super::error::IngestError;
use super::normalize::normalize_row;

/// Rows buffered between the blocking decoder and the async consumer
const ROW_CHANNEL_CAPACITY: usize = 256;

/// One scheduled ingestion run
#[derive(Debug)]
pub struct UploadJob {
    pub job_id: String,
    pub file_path: PathBuf,
    pub batch_size: usize,
}

/// Run one upload job end to end.
///
/// Never fails outward: every outcome is reported through the progress
/// registry and the operational log. Intended to be spawned via
/// [`crate::tasks::spawn_detached`].
pub async fn run_upload_job(
    job: UploadJob,
    pool: PgPool,
    progress: Arc<ProgressRegistry>,
) -> anyhow::Result<()> {
    info!(job_id = %job.job_id, path = %job.file_path.display(), "upload job started");
    progress
        .publish(&job.job_id, ProgressMessage::log("Job started"))
        .await;

    // Removed when dropped, whichever way the job ends.
    let _artifact = StagedArtifact(job.file_path.clone());

    match process(&job, &pool, &progress).await {
        Ok((processed, total)) => {
            info!(job_id = %job.job_id, processed, total, "upload job completed");
            progress
                .publish(&job.job_id, ProgressMessage::complete(processed, total))
                .await;
        },
        Err(e) => {
            error!(job_id = %job.job_id, error = %e, "upload job failed");
            progress
                .publish(&job.job_id, ProgressMessage::error(e.user_message()))
                .await;
        },
    }

    Ok(())
}

async fn process(
    job: &UploadJob,
    pool: &PgPool,
    progress: &ProgressRegistry,
) -> Result<(u64, u64), IngestError> {
    if !tokio::fs::try_exists(&job.file_path).await.unwrap_or(false) {
        return Err(IngestError::ArtifactMissing(job.file_path.clone()));
    }

    // Counting pass: fixes the denominator before any write happens.
    let count_path = job.file_path.clone();
    let total = tokio::task::spawn_blocking(move || count_valid_rows(&count_path))
        .await
        .map_err(|e| IngestError::Internal(format!("counting task aborted: {e}")))??;

    debug!(job_id = %job.job_id, total, "counting pass finished");
    progress
        .publish(
            &job.job_id,
            ProgressMessage::log(format!("Found {total} rows to import")),
        )
        .await;

    // Processing pass: re-decode and stream rows into batches.
    let (tx, mut rx) = mpsc::channel::<Result<RawRow, IngestError>>(ROW_CHANNEL_CAPACITY);
    let decode_path = job.file_path.clone();
    tokio::task::spawn_blocking(move || stream_rows(&decode_path, tx));

    let mut batch = Vec::with_capacity(job.batch_size);
    let mut processed: u64 = 0;
    let mut skipped: u64 = 0;

    while let Some(row) = rx.recv().await {
        match normalize_row(row?) {
            Some(record) => batch.push(record),
            None => skipped += 1,
        }

        if batch.len() >= job.batch_size {
            let submitted = batch.len() as u64;
            upsert_batch(pool, std::mem::take(&mut batch)).await?;
            processed += submitted;
            debug!(job_id = %job.job_id, processed, total, "batch committed");
            progress
                .publish(&job.job_id, ProgressMessage::progress(processed, total))
                .await;
        }
    }

    if !batch.is_empty() {
        let submitted = batch.len() as u64;
        upsert_batch(pool, std::mem::take(&mut batch)).await?;
        processed += submitted;
        debug!(job_id = %job.job_id, processed, total, "final batch committed");
        progress
            .publish(&job.job_id, ProgressMessage::progress(processed, total))
            .await;
    }

    if skipped > 0 {
        info!(job_id = %job.job_id, skipped, "rows skipped during normalization");
    }

    Ok((processed, total))
}

/// Counting pass body, run on the blocking pool
fn count_valid_rows(path: &Path) -> Result<u64, IngestError> {
    let mut total = 0u64;
    for row in CatalogDecoder::open(path)? {
        if normalize_row(row?).is_some() {
            total += 1;
        }
    }
    Ok(total)
}

/// Processing-pass producer, run on the blocking pool.
///
/// Stops at the first decode error (after forwarding it) or when the
/// consumer hangs up.
fn stream_rows(path: &Path, tx: mpsc::Sender<Result<RawRow, IngestError>>) {
    let decoder = match CatalogDecoder::open(path) {
        Ok(decoder) => decoder,
        Err(e) => {
            let _ = tx.blocking_send(Err(e));
            return;
        },
    };

    for row in decoder {
        let failed = row.is_err();
        if tx.blocking_send(row).is_err() || failed {
            return;
        }
    }
}

/// Deletes the staged upload when dropped
struct StagedArtifact(PathBuf);

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.0.display(), error = %e, "failed to remove staged artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        file
    }

    #[test]
    fn test_count_skips_unnormalizable_rows() {
        let file = fixture(
            "sku,name,description,is_active\n\
             ABC-1,Widget,,\n\
             ,Nameless,,\n\
             DEF-2,   ,,\n\
             abc-1,Widget v2,updated,false\n",
        );

        // The two rows with empty sku/name are skipped; duplicates still count.
        assert_eq!(count_valid_rows(file.path()).unwrap(), 2);
    }

    #[test]
    fn test_count_empty_catalog_is_zero() {
        let file = fixture("sku,name\n");
        assert_eq!(count_valid_rows(file.path()).unwrap(), 0);
    }

    #[test]
    fn test_count_propagates_schema_error() {
        let file = fixture("sku,description\nABC-1,hello\n");
        assert!(matches!(
            count_valid_rows(file.path()),
            Err(IngestError::Schema(_))
        ));
    }

    #[test]
    fn test_count_missing_file() {
        assert!(matches!(
            count_valid_rows(Path::new("/nonexistent/upload.gz")),
            Err(IngestError::ArtifactMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_stream_rows_forwards_rows_then_stops() {
        let file = fixture("sku,name\nABC-1,Widget\nDEF-2,Gadget\n");
        let (tx, mut rx) = mpsc::channel(8);
        let path = file.path().to_path_buf();
        tokio::task::spawn_blocking(move || stream_rows(&path, tx))
            .await
            .unwrap();

        let mut rows = Vec::new();
        while let Some(row) = rx.recv().await {
            rows.push(row.unwrap());
        }
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "ABC-1");
    }

    #[tokio::test]
    async fn test_stream_rows_forwards_open_error() {
        let (tx, mut rx) = mpsc::channel(8);
        tokio::task::spawn_blocking(move || stream_rows(Path::new("/nonexistent/upload.gz"), tx))
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Err(IngestError::ArtifactMissing(_)))
        ));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_staged_artifact_removed_on_drop() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        let (_, kept_path) = file.keep().unwrap();
        assert!(kept_path.exists());

        drop(StagedArtifact(path.clone()));
        assert!(!path.exists());
    }
}
