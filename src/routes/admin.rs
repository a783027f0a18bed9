use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::middleware::client_ip::ClientIp;
use crate::models::{company_user, AuditAction, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_admin: Option<bool>,
    pub department: String,
    pub phone: String,
    pub company_email: String,
}

#[derive(Deserialize)]
pub struct AuditLogParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn create_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    ip: ClientIp,
    Json(req): Json<CreateUser>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;

    if req.email.is_empty()
        || req.name.is_empty()
        || req.department.is_empty()
        || req.phone.is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    password::validate_complexity(&req.password).map_err(AppError::BadRequest)?;
    company_user::validate_company_email(&req.company_email, &state.config.company_email_domain)
        .map_err(AppError::BadRequest)?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let mut tx = state.pool.begin().await?;

    let user = db::users::create(
        &mut *tx,
        &req.email,
        &pw_hash,
        &req.name,
        req.is_admin.unwrap_or(false),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("An account with this email already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    db::company_users::create(&mut *tx, user.id, &req.department, &req.phone, &req.company_email)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("This company email is already registered".to_string())
            }
            _ => AppError::Database(e),
        })?;

    tx.commit().await?;

    let actor = crate::routes::current_profile(&state, &auth).await?;
    audit::log_event(
        &state.pool,
        Some(actor.id),
        AuditAction::Created,
        "User",
        user.id,
        &format!("Account created by admin: {}", user.email),
        Some(&ip.0),
    )
    .await;

    Ok(Json(user))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ip: ClientIp,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if id == auth.user_id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Capture the actor's profile before the cascade removes the target's.
    let actor = crate::routes::current_profile(&state, &auth).await?;

    db::users::delete(&state.pool, id).await?;

    audit::log_event(
        &state.pool,
        Some(actor.id),
        AuditAction::Deleted,
        "User",
        id,
        &format!("Account deleted: {}", user.email),
        Some(&ip.0),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn audit_log(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(50).clamp(1, 200);
    let offset = (page - 1) * per_page;

    let entries = db::audit::list(&state.pool, per_page, offset).await?;
    let total = db::audit::count_all(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "entries": entries,
        "total": total,
        "page": page,
        "per_page": per_page,
    })))
}
