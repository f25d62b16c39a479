//! Request handlers, one module per media family.
//!
//! Every handler follows the same sequence: collect form, validate,
//! (conditionally) stage the upload and derive a caption, invoke the
//! capability or the external renderer, verify the artifact exists, and
//! serve it back. No retries anywhere: a failed generation surfaces
//! immediately.

pub mod animation;
pub mod audio;
pub mod image;
pub mod style;
pub mod video;

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;

use cre8_core::error::CoreError;
use cre8_core::media::{MediaKind, RequestToken};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Build the per-request artifact path for `kind`, creating its directory.
pub(crate) async fn prepare_output(
    state: &AppState,
    kind: MediaKind,
    token: &RequestToken,
) -> AppResult<PathBuf> {
    let path = state.store.artifact_path(kind, token);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create output dir: {e}")))?;
    }
    Ok(path)
}

/// Validate and stage an uploaded image under the per-request upload path.
///
/// The upload must decode as an image; anything else is a client fault.
pub(crate) async fn stage_upload(
    state: &AppState,
    token: &RequestToken,
    bytes: &[u8],
) -> AppResult<PathBuf> {
    ::image::load_from_memory(bytes)
        .map_err(|e| CoreError::Validation(format!("uploaded file is not a valid image: {e}")))?;

    let path = state.store.upload_path(token);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;
    Ok(path)
}

/// Best-effort removal of a per-request staging or artifact file.
pub(crate) async fn discard(path: &Path) {
    let _ = tokio::fs::remove_file(path).await;
}

/// Read the artifact at `path` and serve it with the kind's media type and
/// fixed download filename. The file is consumed: it is removed once read.
///
/// A missing or empty file after a reported success is
/// [`CoreError::ArtifactMissing`]; success must never be reported when the
/// output is absent.
pub(crate) async fn serve_artifact(kind: MediaKind, path: &Path) -> AppResult<Response> {
    let data = match tokio::fs::read(path).await {
        Ok(data) if !data.is_empty() => data,
        Ok(_) | Err(_) => {
            return Err(CoreError::ArtifactMissing {
                path: path.display().to_string(),
            }
            .into())
        }
    };
    discard(path).await;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, kind.media_type())
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", kind.file_name()),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(e.to_string()))
}
