use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::export;
use crate::models::{EquipmentStatus, TicketStatus};
use crate::reports::{to_utc_range, DateRange, WARRANTY_WINDOW_DAYS};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RangeParams {
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub range: Option<DateRange>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub end: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

impl RangeParams {
    fn resolve(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let today = Utc::now().date_naive();
        self.range
            .unwrap_or(DateRange::Last30Days)
            .resolve(today, self.start, self.end)
            .map_err(AppError::BadRequest)
    }
}

pub async fn dashboard(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pool = &state.pool;
    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(WARRANTY_WINDOW_DAYS);

    let total = db::reports::equipment_total(pool).await?;
    let available = db::reports::equipment_count_by_status(pool, EquipmentStatus::Available).await?;
    let in_use = db::reports::equipment_count_by_status(pool, EquipmentStatus::InUse).await?;
    let in_repair = db::reports::equipment_count_by_status(pool, EquipmentStatus::InRepair).await?;

    let open = db::reports::open_ticket_count(pool, TicketStatus::Open).await?;
    let in_progress = db::reports::open_ticket_count(pool, TicketStatus::InProgress).await?;
    let critical = db::reports::critical_open_ticket_count(pool).await?;

    let warranty_expiring = db::reports::warranty_expiring_count(pool, today, horizon).await?;
    let maintenance_pending = db::maintenance::pending_count(pool).await?;

    let by_type = db::reports::equipment_by_type(pool).await?;
    let by_status = db::reports::equipment_by_status(pool).await?;

    let recent_maintenance = db::maintenance::recent(pool, 10).await?;
    let recent_tickets = db::tickets::recent(pool, 5).await?;

    Ok(Json(serde_json::json!({
        "equipment": {
            "total": total,
            "available": available,
            "in_use": in_use,
            "in_repair": in_repair,
        },
        "tickets": {
            "open": open,
            "in_progress": in_progress,
            "critical": critical,
        },
        "alerts": {
            "warranty_expiring": warranty_expiring,
            "maintenance_pending": maintenance_pending,
        },
        "equipment_by_type": by_type,
        "equipment_by_status": by_status,
        "recent_maintenance": recent_maintenance,
        "recent_tickets": recent_tickets,
        "timestamp": Utc::now(),
    })))
}

pub async fn equipment_summary(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (start, end) = params.resolve()?;
    let pool = &state.pool;

    let total = db::reports::equipment_total(pool).await?;
    let by_type = db::reports::equipment_by_type(pool).await?;
    let by_status = db::reports::equipment_by_status(pool).await?;
    let by_location = db::reports::equipment_by_location(pool, 10).await?;
    let timeline = db::reports::acquisition_timeline(pool, start, end).await?;

    Ok(Json(serde_json::json!({
        "metadata": report_metadata("equipment_summary", start, end),
        "total_equipment": total,
        "by_type": by_type,
        "by_status": by_status,
        "by_location": by_location,
        "acquisition_timeline": timeline,
    })))
}

pub async fn maintenance_costs(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (start, end) = params.resolve()?;
    let (from, to) = to_utc_range(start, end);
    let pool = &state.pool;

    let summary = db::reports::maintenance_cost_summary(pool, from, to).await?;
    let by_type = db::reports::maintenance_by_type(pool, from, to).await?;
    let by_technician = db::reports::maintenance_by_technician(pool, from, to, 10).await?;
    let monthly_trend = db::reports::monthly_cost_trend(pool, from, to).await?;

    Ok(Json(serde_json::json!({
        "metadata": report_metadata("maintenance_costs", start, end),
        "total_maintenance": summary.total_maintenance,
        "total_cost": summary.total_cost,
        "avg_cost": summary.avg_cost,
        "by_type": by_type,
        "by_technician": by_technician,
        "monthly_trend": monthly_trend,
    })))
}

pub async fn ticket_analysis(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (start, end) = params.resolve()?;
    let (from, to) = to_utc_range(start, end);
    let pool = &state.pool;

    let by_status = db::reports::tickets_by_status(pool, from, to).await?;
    let by_priority = db::reports::tickets_by_priority(pool, from, to).await?;
    let by_assignee = db::reports::tickets_by_assignee(pool, from, to, 10).await?;
    let avg_resolution_hours = db::reports::avg_resolution_hours(pool, from, to).await?;
    let trends = db::reports::ticket_daily_trend(pool, from, to).await?;

    let total: i64 = by_status.iter().map(|s| s.count).sum();

    Ok(Json(serde_json::json!({
        "metadata": report_metadata("ticket_analysis", start, end),
        "total_tickets": total,
        "by_status": by_status,
        "by_priority": by_priority,
        "by_assignee": by_assignee,
        "avg_resolution_hours": avg_resolution_hours,
        "trends": trends,
    })))
}

pub async fn warranty_status(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pool = &state.pool;
    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(WARRANTY_WINDOW_DAYS);

    let counts = db::reports::warranty_counts(pool, today, horizon).await?;
    let expiring = db::reports::warranty_expiring_between(pool, today, horizon).await?;

    Ok(Json(serde_json::json!({
        "as_of": today,
        "active": counts.active,
        "expiring_soon": counts.expiring_soon,
        "expired": counts.expired,
        "no_warranty": counts.no_warranty,
        "critical_equipment": expiring,
    })))
}

pub async fn export_equipment(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ExportParams>,
) -> Result<axum::response::Response, AppError> {
    let equipment = db::equipment::list_all(&state.pool).await?;
    let names = assignee_names(&state).await?;
    let rows = export::equipment_rows(&equipment, &names);
    let date = Utc::now().format("%Y-%m-%d");

    match params.format.as_deref().unwrap_or("csv") {
        "csv" => {
            let csv = export::csv::render(&export::EQUIPMENT_HEADERS, &rows);
            Ok(attachment(
                "text/csv",
                &format!("equipment_report_{date}.csv"),
                csv.into_bytes(),
            ))
        }
        "xlsx" => {
            let bytes = export::xlsx::render("Equipment", &export::EQUIPMENT_HEADERS, &rows)
                .map_err(AppError::Internal)?;
            Ok(attachment(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                &format!("equipment_report_{date}.xlsx"),
                bytes,
            ))
        }
        "pdf" => {
            let bytes = export::pdf::render(
                "Equipment Inventory Report",
                Utc::now(),
                &export::EQUIPMENT_HEADERS[..6],
                &rows.iter().map(|r| r[..6].to_vec()).collect::<Vec<_>>(),
            )
            .map_err(AppError::Internal)?;
            Ok(attachment(
                "application/pdf",
                &format!("equipment_report_{date}.pdf"),
                bytes,
            ))
        }
        other => Err(AppError::BadRequest(format!(
            "Unsupported export format: {other}"
        ))),
    }
}

pub async fn export_maintenance(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ExportParams>,
) -> Result<axum::response::Response, AppError> {
    let logs = db::maintenance::list_all(&state.pool).await?;
    let equipment = db::equipment::list_all(&state.pool).await?;
    let summaries: HashMap<Uuid, String> = equipment
        .iter()
        .map(|e| (e.id, e.summary()))
        .collect();
    let names = technician_names(&state).await?;
    let rows = export::maintenance_rows(&logs, &summaries, &names);
    let date = Utc::now().format("%Y-%m-%d");

    match params.format.as_deref().unwrap_or("csv") {
        "csv" => {
            let csv = export::csv::render(&export::MAINTENANCE_HEADERS, &rows);
            Ok(attachment(
                "text/csv",
                &format!("maintenance_report_{date}.csv"),
                csv.into_bytes(),
            ))
        }
        "xlsx" => {
            let bytes = export::xlsx::render("Maintenance", &export::MAINTENANCE_HEADERS, &rows)
                .map_err(AppError::Internal)?;
            Ok(attachment(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                &format!("maintenance_report_{date}.xlsx"),
                bytes,
            ))
        }
        other => Err(AppError::BadRequest(format!(
            "Unsupported export format: {other}"
        ))),
    }
}

fn report_metadata(report_type: &str, start: NaiveDate, end: NaiveDate) -> serde_json::Value {
    serde_json::json!({
        "report_type": report_type,
        "date_range": format!("{start} to {}", end - Duration::days(1)),
        "generated_at": Utc::now(),
    })
}

fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> axum::response::Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn assignee_names(state: &SharedState) -> Result<HashMap<Uuid, String>, AppError> {
    let directory = db::company_users::list_with_names(&state.pool).await?;
    Ok(directory.into_iter().map(|p| (p.id, p.name)).collect())
}

async fn technician_names(state: &SharedState) -> Result<HashMap<Uuid, String>, AppError> {
    assignee_names(state).await
}
