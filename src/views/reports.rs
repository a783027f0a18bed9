use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::{Duration, Utc};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::reports::WARRANTY_WINDOW_DAYS;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "reports/index.html")]
#[allow(dead_code)]
struct ReportsTemplate {
    user_name: String,
    is_admin: bool,
    warranty_active: i64,
    warranty_expiring: i64,
    warranty_expired: i64,
    warranty_none: i64,
    backup_count: usize,
    latest_backup: String,
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(WARRANTY_WINDOW_DAYS);
    let counts = db::reports::warranty_counts(&state.pool, today, horizon).await?;

    let backups = crate::backup::list(&state.config.backup_dir).unwrap_or_default();
    let latest_backup = backups
        .first()
        .map(|b| {
            format!(
                "{} ({:.2} MB)",
                b.name,
                b.size_bytes as f64 / (1024.0 * 1024.0)
            )
        })
        .unwrap_or_else(|| "No backups yet".to_string());

    let user_name = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default();

    let template = ReportsTemplate {
        user_name,
        is_admin: auth.is_admin,
        warranty_active: counts.active,
        warranty_expiring: counts.expiring_soon,
        warranty_expired: counts.expired,
        warranty_none: counts.no_warranty,
        backup_count: backups.len(),
        latest_backup,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
