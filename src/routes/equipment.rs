use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::equipment::{EquipmentFilter, EquipmentSort};
use crate::db::SortOrder;
use crate::error::AppError;
use crate::middleware::audit;
use crate::middleware::client_ip::ClientIp;
use crate::models::{
    AuditAction, Equipment, EquipmentStatus, EquipmentType, MaintenanceLog,
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
    #[serde(
        rename = "type",
        default,
        deserialize_with = "crate::routes::empty_string_as_none"
    )]
    pub equipment_type: Option<EquipmentType>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct EquipmentPayload {
    pub equipment_type: EquipmentType,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: String,
    pub status: Option<EquipmentStatus>,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub company_user_id: Option<Uuid>,
}

fn validate_payload(req: &EquipmentPayload) -> Result<(), AppError> {
    if req.brand.is_empty() || req.model.is_empty() || req.location.is_empty() {
        return Err(AppError::BadRequest(
            "Brand, model and location are required".to_string(),
        ));
    }
    if req.serial_number.trim().is_empty() || req.serial_number.len() > 100 {
        return Err(AppError::BadRequest(
            "Serial number must be between 1 and 100 characters".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let filter = EquipmentFilter {
        q: params.q.clone(),
        equipment_type: params.equipment_type,
        status: params.status,
        location: params.location.clone(),
        sort_by: EquipmentSort::parse(params.sort_by.as_deref().unwrap_or("created_at")),
        sort_order: SortOrder::parse(params.sort_order.as_deref().unwrap_or("desc")),
        limit: per_page,
        offset: (page - 1) * per_page,
    };

    let equipment = db::equipment::list(&state.pool, &filter).await?;
    let total = db::equipment::count(&state.pool, &filter).await?;

    Ok(Json(serde_json::json!({
        "equipment": equipment,
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
) -> Result<Json<Equipment>, AppError> {
    let equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;
    Ok(Json(equipment))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ip: ClientIp,
    Json(req): Json<EquipmentPayload>,
) -> Result<Json<Equipment>, AppError> {
    auth.require_admin()?;
    validate_payload(&req)?;

    let equipment = db::equipment::create(
        &state.pool,
        req.equipment_type,
        &req.brand,
        &req.model,
        &req.serial_number,
        req.purchase_date,
        req.warranty_expiry,
        &req.location,
        req.status.unwrap_or(EquipmentStatus::Available),
        req.assigned_to,
        req.notes.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Equipment with this serial number already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Created,
        "Equipment",
        equipment.id,
        &format!("Equipment created: {}", equipment.summary()),
        Some(&ip.0),
    )
    .await;

    Ok(Json(equipment))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<EquipmentPayload>,
) -> Result<Json<Equipment>, AppError> {
    auth.require_admin()?;
    validate_payload(&req)?;

    let existing = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let equipment = db::equipment::update(
        &state.pool,
        id,
        req.equipment_type,
        &req.brand,
        &req.model,
        &req.serial_number,
        req.purchase_date,
        req.warranty_expiry,
        &req.location,
        req.status.unwrap_or(existing.status),
        req.assigned_to,
        req.notes.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Equipment not found".to_string()),
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Equipment with this serial number already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Updated,
        "Equipment",
        equipment.id,
        &format!("Equipment updated: {}", equipment.summary()),
        Some(&ip.0),
    )
    .await;

    Ok(Json(equipment))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    db::equipment::delete(&state.pool, id).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Deleted,
        "Equipment",
        id,
        &format!("Equipment deleted: {}", equipment.summary()),
        Some(&ip.0),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn assign(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Equipment>, AppError> {
    let equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let assignee = match req.company_user_id {
        Some(profile_id) => Some(
            db::company_users::find_by_id(&state.pool, profile_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Company user not found".to_string()))?,
        ),
        None => None,
    };

    if equipment.assigned_to == req.company_user_id {
        // Re-applying the same assignment is a no-op.
        return Ok(Json(equipment));
    }

    let updated =
        db::equipment::set_assignee(&state.pool, id, req.company_user_id).await?;

    let profile = current_profile(&state, &auth).await?;
    let (action, details) = match &assignee {
        Some(target) => (
            AuditAction::Assigned,
            format!("Equipment assigned: {} -> {}", updated.summary(), target.email),
        ),
        None => (
            AuditAction::Unassigned,
            format!("Equipment unassigned: {}", updated.summary()),
        ),
    };
    audit::log_event(
        &state.pool,
        Some(profile.id),
        action,
        "Equipment",
        updated.id,
        &details,
        Some(&ip.0),
    )
    .await;

    if let (Some(mailer), Some(target)) = (&state.system_mailer, &assignee) {
        let name = db::company_users::display_name(&state.pool, target.id)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        if let Err(e) = mailer
            .send_equipment_assigned(
                &target.email,
                &name,
                &updated.summary(),
                &state.config.base_url,
            )
            .await
        {
            tracing::warn!("Failed to send assignment email: {e}");
        }
    }

    Ok(Json(updated))
}

pub async fn maintenance_logs(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MaintenanceLog>>, AppError> {
    db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let logs = db::maintenance::list_by_equipment(&state.pool, id).await?;
    Ok(Json(logs))
}

pub async fn statistics(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let total = db::reports::equipment_total(&state.pool).await?;
    let by_status = db::reports::equipment_by_status(&state.pool).await?;
    let by_type = db::reports::equipment_by_type(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "total": total,
        "by_status": by_status,
        "by_type": by_type,
    })))
}
