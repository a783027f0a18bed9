use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{company_user, CompanyUserWithName};
use crate::routes::current_profile;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub department: String,
    pub phone: String,
    pub email: String,
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    let profile = current_profile(&state, &auth).await?;

    Ok(Json(serde_json::json!({
        "user": user,
        "profile": profile,
    })))
}

pub async fn update_me(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<UpdateProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.department.is_empty() || req.phone.is_empty() {
        return Err(AppError::BadRequest(
            "Department and phone are required".to_string(),
        ));
    }

    company_user::validate_company_email(&req.email, &state.config.company_email_domain)
        .map_err(AppError::BadRequest)?;

    let profile = current_profile(&state, &auth).await?;

    let updated = db::company_users::update(
        &state.pool,
        profile.id,
        &req.department,
        &req.phone,
        &req.email,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("This company email is already registered".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(serde_json::json!({ "profile": updated })))
}

pub async fn list_company_users(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<CompanyUserWithName>>, AppError> {
    let directory = db::company_users::list_with_names(&state.pool).await?;
    Ok(Json(directory))
}
