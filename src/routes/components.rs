use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::middleware::client_ip::ClientIp;
use crate::models::{AuditAction, Component};
use crate::routes::current_profile;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ComponentPayload {
    pub component_type: String,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub specifications: Option<String>,
}

fn validate_payload(req: &ComponentPayload) -> Result<(), AppError> {
    if req.component_type.is_empty() || req.brand.is_empty() || req.model.is_empty() {
        return Err(AppError::BadRequest(
            "Component type, brand and model are required".to_string(),
        ));
    }
    Ok(())
}

pub async fn list_by_equipment(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(equipment_id): Path<Uuid>,
) -> Result<Json<Vec<Component>>, AppError> {
    db::equipment::find_by_id(&state.pool, equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let components = db::components::list_by_equipment(&state.pool, equipment_id).await?;
    Ok(Json(components))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(equipment_id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<ComponentPayload>,
) -> Result<Json<Component>, AppError> {
    auth.require_admin()?;
    validate_payload(&req)?;

    db::equipment::find_by_id(&state.pool, equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let component = db::components::create(
        &state.pool,
        equipment_id,
        &req.component_type,
        &req.brand,
        &req.model,
        req.serial_number.as_deref().unwrap_or(""),
        req.specifications.as_deref().unwrap_or(""),
    )
    .await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Created,
        "Component",
        component.id,
        &format!(
            "Component added: {} - {} {}",
            component.component_type, component.brand, component.model
        ),
        Some(&ip.0),
    )
    .await;

    Ok(Json(component))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
    Json(req): Json<ComponentPayload>,
) -> Result<Json<Component>, AppError> {
    auth.require_admin()?;
    validate_payload(&req)?;

    let component = db::components::update(
        &state.pool,
        id,
        &req.component_type,
        &req.brand,
        &req.model,
        req.serial_number.as_deref().unwrap_or(""),
        req.specifications.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Component not found".to_string()),
        _ => AppError::Database(e),
    })?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Updated,
        "Component",
        component.id,
        &format!(
            "Component updated: {} - {} {}",
            component.component_type, component.brand, component.model
        ),
        Some(&ip.0),
    )
    .await;

    Ok(Json(component))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let component = db::components::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Component not found".to_string()))?;

    db::components::delete(&state.pool, id).await?;

    let profile = current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(profile.id),
        AuditAction::Deleted,
        "Component",
        id,
        &format!(
            "Component removed: {} - {} {}",
            component.component_type, component.brand, component.model
        ),
        Some(&ip.0),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
