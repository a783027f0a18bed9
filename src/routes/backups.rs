use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::backup::{self, BackupInfo};
use crate::error::AppError;
use crate::state::SharedState;

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<BackupInfo>, AppError> {
    auth.require_admin()?;

    let result = backup::create(&state.config).await;

    if let (Some(mailer), Some(admin_email)) = (&state.system_mailer, &state.config.admin_email) {
        let (archive_name, success) = match &result {
            Ok(info) => (info.name.clone(), true),
            Err(_) => ("(not created)".to_string(), false),
        };
        if let Err(e) = mailer
            .send_backup_result(admin_email, &archive_name, success)
            .await
        {
            tracing::warn!("Failed to send backup notification: {e}");
        }
    }

    match result {
        Ok(info) => {
            tracing::info!("Backup created: {} ({} bytes)", info.name, info.size_bytes);
            Ok(Json(info))
        }
        Err(e) => Err(AppError::Internal(format!("Backup failed: {e}"))),
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<BackupInfo>>, AppError> {
    auth.require_admin()?;

    let backups = backup::list(&state.config.backup_dir).map_err(AppError::Internal)?;
    Ok(Json(backups))
}

pub async fn download(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<axum::response::Response, AppError> {
    auth.require_admin()?;

    if !backup::is_valid_archive_name(&name) {
        return Err(AppError::BadRequest("Invalid archive name".to_string()));
    }

    let path = state.config.backup_dir.join(&name);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("Backup not found: {name}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if !backup::is_valid_archive_name(&name) {
        return Err(AppError::BadRequest("Invalid archive name".to_string()));
    }

    if !state.config.backup_dir.join(&name).exists() {
        return Err(AppError::NotFound(format!("Backup not found: {name}")));
    }

    backup::delete(&state.config.backup_dir, &name).map_err(AppError::Internal)?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
