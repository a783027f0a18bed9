use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::{Duration, Utc};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{EquipmentStatus, TicketStatus};
use crate::reports::WARRANTY_WINDOW_DAYS;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "dashboard/index.html")]
#[allow(dead_code)]
struct DashboardTemplate {
    user_name: String,
    is_admin: bool,
    total_equipment: i64,
    available_equipment: i64,
    in_use_equipment: i64,
    in_repair_equipment: i64,
    open_tickets: i64,
    in_progress_tickets: i64,
    critical_tickets: i64,
    warranty_expiring_soon: i64,
    maintenance_pending: i64,
    recent_maintenance: Vec<MaintenanceRow>,
    recent_tickets: Vec<TicketRow>,
}

#[allow(dead_code)]
struct MaintenanceRow {
    id: String,
    title: String,
    type_label: String,
    equipment: String,
    start_date: String,
}

#[allow(dead_code)]
struct TicketRow {
    id: String,
    title: String,
    priority_label: String,
    status_label: String,
    created_at: String,
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let pool = &state.pool;
    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(WARRANTY_WINDOW_DAYS);

    let total_equipment = db::reports::equipment_total(pool).await?;
    let available_equipment =
        db::reports::equipment_count_by_status(pool, EquipmentStatus::Available).await?;
    let in_use_equipment =
        db::reports::equipment_count_by_status(pool, EquipmentStatus::InUse).await?;
    let in_repair_equipment =
        db::reports::equipment_count_by_status(pool, EquipmentStatus::InRepair).await?;

    let open_tickets = db::reports::open_ticket_count(pool, TicketStatus::Open).await?;
    let in_progress_tickets =
        db::reports::open_ticket_count(pool, TicketStatus::InProgress).await?;
    let critical_tickets = db::reports::critical_open_ticket_count(pool).await?;

    let warranty_expiring_soon =
        db::reports::warranty_expiring_count(pool, today, horizon).await?;
    let maintenance_pending = db::maintenance::pending_count(pool).await?;

    let mut recent_maintenance = Vec::new();
    for log in db::maintenance::recent(pool, 10).await? {
        let equipment = db::equipment::find_by_id(pool, log.equipment_id)
            .await?
            .map(|e| e.summary())
            .unwrap_or_default();
        recent_maintenance.push(MaintenanceRow {
            id: log.id.to_string(),
            title: log.title.clone(),
            type_label: log.maintenance_type.label().to_string(),
            equipment,
            start_date: log.start_date.format("%Y-%m-%d").to_string(),
        });
    }

    let recent_tickets = db::tickets::recent(pool, 5)
        .await?
        .into_iter()
        .map(|t| TicketRow {
            id: t.id.to_string(),
            title: t.title.clone(),
            priority_label: t.priority.label().to_string(),
            status_label: t.status.label().to_string(),
            created_at: t.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect();

    let user_name = db::users::find_by_id(pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default();

    let template = DashboardTemplate {
        user_name,
        is_admin: auth.is_admin,
        total_equipment,
        available_equipment,
        in_use_equipment,
        in_repair_equipment,
        open_tickets,
        in_progress_tickets,
        critical_tickets,
        warranty_expiring_soon,
        maintenance_pending,
        recent_maintenance,
        recent_tickets,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
