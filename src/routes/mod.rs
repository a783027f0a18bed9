pub mod admin;
pub mod auth;
pub mod backups;
pub mod components;
pub mod equipment;
pub mod maintenance;
pub mod reports;
pub mod tickets;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::CompanyUser;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Equipment
        .route(
            "/api/v1/equipment",
            get(equipment::list).post(equipment::create),
        )
        .route("/api/v1/equipment/statistics", get(equipment::statistics))
        .route(
            "/api/v1/equipment/{id}",
            get(equipment::get)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .route(
            "/api/v1/equipment/{id}/maintenance",
            get(equipment::maintenance_logs),
        )
        .route("/api/v1/equipment/{id}/assign", post(equipment::assign))
        .route(
            "/api/v1/equipment/{id}/components",
            get(components::list_by_equipment).post(components::create),
        )
        .route(
            "/api/v1/components/{id}",
            put(components::update).delete(components::delete),
        )
        // Maintenance
        .route(
            "/api/v1/maintenance",
            get(maintenance::list).post(maintenance::create),
        )
        .route("/api/v1/maintenance/recent", get(maintenance::recent))
        .route(
            "/api/v1/maintenance/{id}",
            get(maintenance::get)
                .put(maintenance::update)
                .delete(maintenance::delete),
        )
        .route(
            "/api/v1/maintenance/{id}/complete",
            post(maintenance::complete),
        )
        // Support tickets
        .route(
            "/api/v1/support-tickets",
            get(tickets::list).post(tickets::create),
        )
        .route(
            "/api/v1/support-tickets/{id}",
            get(tickets::get)
                .put(tickets::update)
                .delete(tickets::delete),
        )
        .route("/api/v1/support-tickets/{id}/assign", post(tickets::assign))
        .route("/api/v1/support-tickets/{id}/close", post(tickets::close))
        // Reports
        .route("/api/v1/reports/dashboard", get(reports::dashboard))
        .route(
            "/api/v1/reports/equipment-summary",
            get(reports::equipment_summary),
        )
        .route(
            "/api/v1/reports/maintenance-costs",
            get(reports::maintenance_costs),
        )
        .route(
            "/api/v1/reports/ticket-analysis",
            get(reports::ticket_analysis),
        )
        .route(
            "/api/v1/reports/warranty-status",
            get(reports::warranty_status),
        )
        .route(
            "/api/v1/reports/export/equipment",
            get(reports::export_equipment),
        )
        .route(
            "/api/v1/reports/export/maintenance",
            get(reports::export_maintenance),
        )
        // Backups
        .route("/api/v1/backups", get(backups::list).post(backups::create))
        .route(
            "/api/v1/backups/{name}",
            get(backups::download).delete(backups::delete),
        )
        // Users
        .route(
            "/api/v1/users/me",
            get(users::me).put(users::update_me),
        )
        .route("/api/v1/company-users", get(users::list_company_users))
        // Admin
        .route(
            "/api/v1/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/api/v1/admin/users/{id}", delete(admin::delete_user))
        .route("/api/v1/admin/audit-log", get(admin::audit_log))
}

/// Query-string filters arrive as `?status=` when a form select is left
/// blank; treat the empty string as absent instead of failing to parse.
pub(crate) fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    use serde::de::IntoDeserializer;
    use serde::Deserialize;

    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
    }
}

/// The caller's company profile, provisioned with defaults on first use.
pub(crate) async fn current_profile(
    state: &SharedState,
    auth: &AuthUser,
) -> Result<CompanyUser, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    db::company_users::get_or_create(
        &state.pool,
        user.id,
        &user.email,
        &state.config.company_email_domain,
    )
    .await
    .map_err(AppError::Database)
}
