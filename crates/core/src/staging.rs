//! Upload staging.
//!
//! Each job gets its own directory under the staging root, keyed by the
//! job id, so concurrent jobs can never collide on a filename. The
//! staged file is deleted when the job ends, whichever way it ends.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Fallback name used when the uploaded filename sanitizes to nothing.
pub const DEFAULT_STAGED_NAME: &str = "upload.xlsx";

/// A file persisted to local storage for the worker to read by path.
///
/// Owned by exactly one job. Deletion happens through [`StagedFile::unstage`],
/// which consumes the value -- a second attempt is unrepresentable.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    job_dir: PathBuf,
}

impl StagedFile {
    /// Absolute path of the staged file, for the worker's `--input-file` flag.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file and its per-job directory.
    ///
    /// Best-effort: a file that is already gone is logged at debug, any
    /// other failure at warn. Never returns an error -- cleanup failure
    /// must not affect the job outcome.
    pub async fn unstage(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed staged file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Staged file already removed");
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged file");
            }
        }
        // The per-job directory only ever holds the one file; if removal
        // fails (e.g. the worker dropped something next to it) leave it.
        let _ = tokio::fs::remove_dir(&self.job_dir).await;
    }
}

/// Reduce a client-supplied filename to a single safe path component.
///
/// Directory parts are discarded, so `../../etc/passwd` stages as
/// `passwd` inside the job directory. Names that sanitize to nothing
/// fall back to [`DEFAULT_STAGED_NAME`].
pub fn sanitize_filename(name: &str) -> String {
    match Path::new(name).file_name().and_then(|n| n.to_str()) {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => DEFAULT_STAGED_NAME.to_string(),
    }
}

/// Persist an uploaded file under `staging_root/<job_id>/`.
///
/// Creates the job directory if absent (idempotent). Returns the staged
/// file with its absolute path resolved.
pub async fn stage(
    staging_root: &Path,
    job_id: Uuid,
    filename: &str,
    bytes: &[u8],
) -> CoreResult<StagedFile> {
    let job_dir = staging_root.join(job_id.to_string());
    tokio::fs::create_dir_all(&job_dir)
        .await
        .map_err(CoreError::Storage)?;

    let staged_name = sanitize_filename(filename);
    let path = job_dir.join(&staged_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(CoreError::Storage)?;

    // The worker resolves the input path from its own working directory,
    // so hand it an absolute path.
    let path = tokio::fs::canonicalize(&path)
        .await
        .map_err(CoreError::Storage)?;

    tracing::debug!(%job_id, path = %path.display(), "Staged upload");

    Ok(StagedFile { path, job_dir })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_plain_name() {
        assert_eq!(sanitize_filename("data.xlsx"), "data.xlsx");
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/etc/shadow"), "shadow");
        assert_eq!(sanitize_filename("nested/dir/file.xlsx"), "file.xlsx");
    }

    #[test]
    fn sanitize_degenerate_names_fall_back() {
        assert_eq!(sanitize_filename(""), DEFAULT_STAGED_NAME);
        assert_eq!(sanitize_filename(".."), DEFAULT_STAGED_NAME);
        assert_eq!(sanitize_filename("/"), DEFAULT_STAGED_NAME);
    }

    #[tokio::test]
    async fn stage_writes_file_and_returns_absolute_path() {
        let root = tempfile::tempdir().unwrap();
        let job_id = Uuid::new_v4();

        let staged = stage(root.path(), job_id, "input.xlsx", b"cell data")
            .await
            .unwrap();

        assert!(staged.path().is_absolute());
        let contents = tokio::fs::read(staged.path()).await.unwrap();
        assert_eq!(contents, b"cell data");
    }

    #[tokio::test]
    async fn stage_sanitizes_traversal_attempts() {
        let root = tempfile::tempdir().unwrap();
        let job_id = Uuid::new_v4();

        let staged = stage(root.path(), job_id, "../../escape.xlsx", b"x")
            .await
            .unwrap();

        // The file must land inside the job directory, not above the root.
        assert!(staged.path().starts_with(root.path().canonicalize().unwrap()));
        assert_eq!(
            staged.path().file_name().unwrap().to_str().unwrap(),
            "escape.xlsx"
        );
    }

    #[tokio::test]
    async fn unstage_removes_file_and_job_dir() {
        let root = tempfile::tempdir().unwrap();
        let job_id = Uuid::new_v4();

        let staged = stage(root.path(), job_id, "input.xlsx", b"x").await.unwrap();
        let path = staged.path().to_path_buf();
        let job_dir = root.path().join(job_id.to_string());

        staged.unstage().await;

        assert!(!path.exists());
        assert!(!job_dir.exists());
    }

    #[tokio::test]
    async fn unstage_tolerates_already_removed_file() {
        let root = tempfile::tempdir().unwrap();
        let job_id = Uuid::new_v4();

        let staged = stage(root.path(), job_id, "input.xlsx", b"x").await.unwrap();
        tokio::fs::remove_file(staged.path()).await.unwrap();

        // Must not panic or error.
        staged.unstage().await;
    }
}
