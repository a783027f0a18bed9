use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "backups/list.html")]
#[allow(dead_code)]
struct BackupListTemplate {
    user_name: String,
    is_admin: bool,
    backups: Vec<BackupRow>,
    backup_count: usize,
}

#[allow(dead_code)]
struct BackupRow {
    name: String,
    size_mb: String,
    created: String,
}

pub async fn list_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let backups = crate::backup::list(&state.config.backup_dir)
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|b| BackupRow {
            name: b.name,
            size_mb: format!("{:.2}", b.size_bytes as f64 / (1024.0 * 1024.0)),
            created: b.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect::<Vec<_>>();

    let user_name = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default();

    let backup_count = backups.len();
    let template = BackupListTemplate {
        user_name,
        is_admin: auth.is_admin,
        backups,
        backup_count,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
