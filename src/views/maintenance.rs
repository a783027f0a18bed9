use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;
use crate::views::SelectOption;

const TYPE_OPTIONS: [(&str, &str); 6] = [
    ("repair", "Repair"),
    ("preventive", "Preventive Maintenance"),
    ("incident", "Incident"),
    ("upgrade", "Update/Upgrade"),
    ("installation", "Installation"),
    ("configuration", "Configuration"),
];

const PRIORITY_OPTIONS: [(&str, &str); 3] = [
    ("high", "High"),
    ("medium", "Medium"),
    ("low", "Low"),
];

#[derive(Template)]
#[template(path = "maintenance/form.html")]
#[allow(dead_code)]
struct MaintenanceFormTemplate {
    user_name: String,
    is_admin: bool,
    equipment_id: String,
    equipment_summary: String,
    type_options: Vec<SelectOption>,
    priority_options: Vec<SelectOption>,
}

pub async fn new_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(equipment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let equipment = db::equipment::find_by_id(&state.pool, equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let user_name = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default();

    let template = MaintenanceFormTemplate {
        user_name,
        is_admin: auth.is_admin,
        equipment_id: equipment.id.to_string(),
        equipment_summary: equipment.summary(),
        type_options: TYPE_OPTIONS
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
        priority_options: PRIORITY_OPTIONS
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
