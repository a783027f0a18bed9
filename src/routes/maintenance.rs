use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::maintenance::{MaintenanceFilter, MaintenanceSort};
use crate::db::SortOrder;
use crate::error::AppError;
use crate::middleware::audit;
use crate::middleware::client_ip::ClientIp;
use crate::models::{
    AuditAction, EquipmentStatus, MaintenanceLog, MaintenancePriority, MaintenanceType,
};
use crate::routes::current_profile;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub q: Option<String>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub maintenance_type: Option<MaintenanceType>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub priority: Option<MaintenancePriority>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub technician_id: Option<Uuid>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub equipment_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CreateMaintenance {
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub parts_used: Option<String>,
    pub cost: Option<Decimal>,
    pub priority: Option<MaintenancePriority>,
    pub resolution: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMaintenance {
    pub maintenance_type: MaintenanceType,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub parts_used: Option<String>,
    pub cost: Option<Decimal>,
    pub priority: Option<MaintenancePriority>,
    pub resolution: Option<String>,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let filter = MaintenanceFilter {
        q: params.q.clone(),
        maintenance_type: params.maintenance_type,
        priority: params.priority,
        technician_id: params.technician_id,
        equipment_id: params.equipment_id,
        sort_by: MaintenanceSort::parse(params.sort_by.as_deref().unwrap_or("start_date")),
        sort_order: SortOrder::parse(params.sort_order.as_deref().unwrap_or("desc")),
        limit: per_page,
        offset: (page - 1) * per_page,
    };

    let logs = db::maintenance::list(&state.pool, &filter).await?;
    let total = db::maintenance::count(&state.pool, &filter).await?;

    Ok(Json(serde_json::json!({
        "maintenance": logs,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": (total as f64 / per_page as f64).ceil() as i64,
    })))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceLog>, AppError> {
    let log = db::maintenance::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;
    Ok(Json(log))
}

pub async fn recent(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<MaintenanceLog>>, AppError> {
    let logs = db::maintenance::recent(&state.pool, 10).await?;
    Ok(Json(logs))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ip: ClientIp,
    Json(req): Json<CreateMaintenance>,
) -> Result<Json<MaintenanceLog>, AppError> {
    if req.title.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let equipment = db::equipment::find_by_id(&state.pool, req.equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    // The caller's profile is the technician of record.
    let profile = current_profile(&state, &auth).await?;

    let log = db::maintenance::create(
        &state.pool,
        req.equipment_id,
        req.maintenance_type,
        &req.title,
        &req.description,
        profile.id,
        req.start_date,
        req.end_date,
        req.parts_used.as_deref().unwrap_or(""),
        req.cost,
        req.priority.unwrap_or(MaintenancePriority::Medium),
        req.resolution.as_deref().unwrap_or(""),
    )
    .await?;

    // An open repair takes the equipment out of service.
    if log.maintenance_type == MaintenanceType::Repair && log.end_date.is_none() {
        db::equipment::set_status(&state.pool, equipment.id, EquipmentStatus::InRepair).await?;
    }

    let action = if log.maintenance_type == MaintenanceType::Repair {
        AuditAction::Repaired
    } else {
        AuditAction::Created
    };
    audit::log_event(
        &state.pool,
        Some(profile.id),
        action,
        "MaintenanceLog",
        log.id,
        &format!(
            "Maintenance created for {}: {}",
            equipment.summary(),
            log.title
        ),
        Some(&ip.0),
    )
    .await;

    Ok(Json(log))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<UpdateMaintenance>,
) -> Result<Json<MaintenanceLog>, AppError> {
    if req.title.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let log = db::maintenance::update(
        &state.pool,
        id,
        req.maintenance_type,
        &req.title,
        &req.description,
        req.start_date,
        req.end_date,
        req.parts_used.as_deref().unwrap_or(""),
        req.cost,
        req.priority.unwrap_or(MaintenancePriority::Medium),
        req.resolution.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Maintenance log not found".to_string()),
        _ => AppError::Database(e),
    })?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Updated,
        "MaintenanceLog",
        log.id,
        &format!("Maintenance updated: {}", log.title),
        Some(&ip.0),
    )
    .await;

    Ok(Json(log))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let log = db::maintenance::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

    db::maintenance::delete(&state.pool, id).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Deleted,
        "MaintenanceLog",
        id,
        &format!("Maintenance deleted: {}", log.title),
        Some(&ip.0),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn complete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<MaintenanceLog>, AppError> {
    let before = db::maintenance::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

    let was_pending = before.is_pending();

    let log = db::maintenance::complete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

    // Completing a repeated time is a no-op; only the first completion is
    // audited and releases the equipment.
    if was_pending {
        if log.maintenance_type == MaintenanceType::Repair {
            let open_repairs =
                db::maintenance::other_pending_repairs(&state.pool, log.equipment_id, log.id)
                    .await?;
            if open_repairs == 0 {
                if let Some(equipment) =
                    db::equipment::find_by_id(&state.pool, log.equipment_id).await?
                {
                    if equipment.status == EquipmentStatus::InRepair {
                        db::equipment::set_status(
                            &state.pool,
                            equipment.id,
                            EquipmentStatus::Available,
                        )
                        .await?;
                    }
                }
            }
        }

        let profile = current_profile(&state, &auth).await?;
        audit::log_event(
            &state.pool,
            Some(profile.id),
            AuditAction::Updated,
            "MaintenanceLog",
            log.id,
            &format!("Maintenance completed: {}", log.title),
            Some(&ip.0),
        )
        .await;
    }

    Ok(Json(log))
}
