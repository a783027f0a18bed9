use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::tickets::{TicketFilter, TicketSort};
use crate::db::SortOrder;
use crate::error::AppError;
use crate::middleware::audit;
use crate::middleware::client_ip::ClientIp;
use crate::models::{AuditAction, SupportTicket, TicketPriority, TicketStatus};
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
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub priority: Option<TicketPriority>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub assigned_to: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
    pub equipment_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateTicket {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to: Option<Uuid>,
    pub resolution: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignTicket {
    pub technician_id: Uuid,
}

#[derive(Deserialize)]
pub struct CloseTicket {
    pub resolution: String,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let filter = TicketFilter {
        q: params.q.clone(),
        status: params.status,
        priority: params.priority,
        assigned_to: params.assigned_to,
        sort_by: TicketSort::parse(params.sort_by.as_deref().unwrap_or("created_at")),
        sort_order: SortOrder::parse(params.sort_order.as_deref().unwrap_or("desc")),
        limit: per_page,
        offset: (page - 1) * per_page,
    };

    let tickets = db::tickets::list(&state.pool, &filter).await?;
    let total = db::tickets::count(&state.pool, &filter).await?;

    Ok(Json(serde_json::json!({
        "tickets": tickets,
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
) -> Result<Json<SupportTicket>, AppError> {
    let ticket = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    Ok(Json(ticket))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ip: ClientIp,
    Json(req): Json<CreateTicket>,
) -> Result<Json<SupportTicket>, AppError> {
    if req.title.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    if let Some(equipment_id) = req.equipment_id {
        db::equipment::find_by_id(&state.pool, equipment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;
    }

    let profile = current_profile(&state, &auth).await?;

    let ticket = db::tickets::create(
        &state.pool,
        &req.title,
        &req.description,
        profile.id,
        req.priority.unwrap_or(TicketPriority::Medium),
        req.equipment_id,
    )
    .await?;

    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Created,
        "SupportTicket",
        ticket.id,
        &format!("Support ticket created: {}", ticket.title),
        Some(&ip.0),
    )
    .await;

    Ok(Json(ticket))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<UpdateTicket>,
) -> Result<Json<SupportTicket>, AppError> {
    if req.title.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let existing = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    if !existing.status.can_transition(req.status) {
        return Err(AppError::Conflict(format!(
            "Cannot move ticket from {} to {}",
            existing.status.label(),
            req.status.label()
        )));
    }

    if let Some(assignee) = req.assigned_to {
        db::company_users::find_by_id(&state.pool, assignee)
            .await?
            .ok_or_else(|| AppError::BadRequest("Technician not found".to_string()))?;
    }

    let ticket = db::tickets::update(
        &state.pool,
        id,
        &req.title,
        &req.description,
        req.priority,
        req.status,
        req.assigned_to,
        req.resolution.as_deref().unwrap_or(&existing.resolution),
    )
    .await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Updated,
        "SupportTicket",
        ticket.id,
        &format!("Support ticket updated: {}", ticket.title),
        Some(&ip.0),
    )
    .await;

    Ok(Json(ticket))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let ticket = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    db::tickets::delete(&state.pool, id).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Deleted,
        "SupportTicket",
        id,
        &format!("Support ticket deleted: {}", ticket.title),
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
    Json(req): Json<AssignTicket>,
) -> Result<Json<SupportTicket>, AppError> {
    let ticket = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    if ticket.status == TicketStatus::Closed {
        return Err(AppError::Conflict(
            "Cannot assign a closed ticket".to_string(),
        ));
    }

    let technician = db::company_users::find_by_id(&state.pool, req.technician_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Technician not found".to_string()))?;

    if ticket.assigned_to == Some(technician.id) {
        // Re-applying the same assignment is a no-op.
        return Ok(Json(ticket));
    }

    // Picking up an open ticket starts work on it.
    let next_status = match ticket.status {
        TicketStatus::Open => TicketStatus::InProgress,
        other => other,
    };

    let updated = db::tickets::assign(&state.pool, id, technician.id, next_status).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Assigned,
        "SupportTicket",
        updated.id,
        &format!("Ticket assigned to {}", technician.email),
        Some(&ip.0),
    )
    .await;

    if let Some(mailer) = &state.system_mailer {
        let name = db::company_users::display_name(&state.pool, technician.id)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        if let Err(e) = mailer
            .send_ticket_assigned(
                &technician.email,
                &name,
                &updated.title,
                &state.config.base_url,
            )
            .await
        {
            tracing::warn!("Failed to send ticket assignment email: {e}");
        }
    }

    Ok(Json(updated))
}

pub async fn close(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<CloseTicket>,
) -> Result<Json<SupportTicket>, AppError> {
    let ticket = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    if ticket.status == TicketStatus::Closed {
        // Closing again with the same resolution is idempotent; a different
        // resolution would silently rewrite history.
        if ticket.resolution == req.resolution {
            return Ok(Json(ticket));
        }
        return Err(AppError::Conflict(
            "Ticket is already closed with a different resolution".to_string(),
        ));
    }

    let updated = db::tickets::close(&state.pool, id, &req.resolution).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::StatusChanged,
        "SupportTicket",
        updated.id,
        &format!("Ticket closed: {}", updated.title),
        Some(&ip.0),
    )
    .await;

    Ok(Json(updated))
}
