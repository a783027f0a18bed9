use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::equipment::{EquipmentFilter, EquipmentSort};
use crate::db::SortOrder;
use crate::error::AppError;
use crate::models::{Equipment, EquipmentStatus, EquipmentType};
use crate::state::SharedState;
use crate::views::SelectOption;

const TYPE_OPTIONS: [(&str, &str); 9] = [
    ("laptop", "Laptop"),
    ("desktop", "Desktop"),
    ("monitor", "Monitor"),
    ("printer", "Printer"),
    ("network_device", "Network Device"),
    ("server", "Server"),
    ("phone", "Phone"),
    ("tablet", "Tablet"),
    ("other", "Other"),
];

const STATUS_OPTIONS: [(&str, &str); 6] = [
    ("available", "Available"),
    ("in_use", "In Use"),
    ("in_repair", "In Repair"),
    ("retired", "Retired"),
    ("lost", "Lost"),
    ("disposed", "Disposed"),
];

fn options(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|(value, label)| SelectOption {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

#[derive(Deserialize)]
pub struct ListQuery {
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

#[derive(Template)]
#[template(path = "equipment/list.html")]
#[allow(dead_code)]
struct EquipmentListTemplate {
    user_name: String,
    is_admin: bool,
    equipment_list: Vec<EquipmentRow>,
    search_query: String,
    type_filter: String,
    status_filter: String,
    location_filter: String,
    type_options: Vec<SelectOption>,
    status_options: Vec<SelectOption>,
}

#[allow(dead_code)]
struct EquipmentRow {
    id: String,
    type_label: String,
    brand: String,
    model: String,
    serial_number: String,
    location: String,
    status_label: String,
    assigned_to: String,
}

#[derive(Template)]
#[template(path = "equipment/detail.html")]
#[allow(dead_code)]
struct EquipmentDetailTemplate {
    user_name: String,
    is_admin: bool,
    id: String,
    type_label: String,
    brand: String,
    model: String,
    serial_number: String,
    purchase_date: String,
    warranty_expiry: String,
    location: String,
    status_label: String,
    assigned_to: String,
    notes: String,
    components: Vec<ComponentRow>,
    maintenance_logs: Vec<MaintenanceRow>,
}

#[allow(dead_code)]
struct ComponentRow {
    component_type: String,
    brand: String,
    model: String,
    serial_number: String,
    installed_date: String,
}

#[allow(dead_code)]
struct MaintenanceRow {
    id: String,
    title: String,
    type_label: String,
    priority_label: String,
    start_date: String,
    end_date: String,
    cost: String,
}

#[derive(Template)]
#[template(path = "equipment/form.html")]
#[allow(dead_code)]
struct EquipmentFormTemplate {
    user_name: String,
    is_admin: bool,
    heading: String,
    equipment_id: String,
    type_options: Vec<SelectOption>,
    status_options: Vec<SelectOption>,
    assignee_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "equipment/confirm_delete.html")]
#[allow(dead_code)]
struct ConfirmDeleteTemplate {
    user_name: String,
    is_admin: bool,
    id: String,
    summary: String,
}

async fn user_name(state: &SharedState, auth: &AuthUser) -> Result<String, AppError> {
    Ok(db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default())
}

async fn assignee_name(state: &SharedState, id: Option<Uuid>) -> Result<String, AppError> {
    let Some(id) = id else {
        return Ok("Unassigned".to_string());
    };
    Ok(db::company_users::display_name(&state.pool, id)
        .await?
        .unwrap_or_else(|| "Unassigned".to_string()))
}

pub async fn list_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = EquipmentFilter {
        q: query.q.clone(),
        equipment_type: query.equipment_type,
        status: query.status,
        location: query.location.clone(),
        sort_by: EquipmentSort::CreatedAt,
        sort_order: SortOrder::Desc,
        limit: 100,
        offset: 0,
    };

    let mut rows = Vec::new();
    for item in db::equipment::list(&state.pool, &filter).await? {
        let assigned_to = assignee_name(&state, item.assigned_to).await?;
        rows.push(EquipmentRow {
            id: item.id.to_string(),
            type_label: item.equipment_type.label().to_string(),
            brand: item.brand,
            model: item.model,
            serial_number: item.serial_number,
            location: item.location,
            status_label: item.status.label().to_string(),
            assigned_to,
        });
    }

    let template = EquipmentListTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        equipment_list: rows,
        search_query: query.q.unwrap_or_default(),
        type_filter: query
            .equipment_type
            .map(|t| t.label().to_string())
            .unwrap_or_default(),
        status_filter: query
            .status
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        location_filter: query.location.unwrap_or_default(),
        type_options: options(&TYPE_OPTIONS),
        status_options: options(&STATUS_OPTIONS),
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn detail_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let equipment: Equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let components = db::components::list_by_equipment(&state.pool, id)
        .await?
        .into_iter()
        .map(|c| ComponentRow {
            component_type: c.component_type,
            brand: c.brand,
            model: c.model,
            serial_number: c.serial_number,
            installed_date: c.installed_date.format("%Y-%m-%d").to_string(),
        })
        .collect();

    let maintenance_logs = db::maintenance::list_by_equipment(&state.pool, id)
        .await?
        .into_iter()
        .map(|m| MaintenanceRow {
            id: m.id.to_string(),
            title: m.title.clone(),
            type_label: m.maintenance_type.label().to_string(),
            priority_label: m.priority.label().to_string(),
            start_date: m.start_date.format("%Y-%m-%d").to_string(),
            end_date: m
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Pending".to_string()),
            cost: m.cost.map(|c| c.to_string()).unwrap_or_default(),
        })
        .collect();

    let assigned_to = assignee_name(&state, equipment.assigned_to).await?;

    let template = EquipmentDetailTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        id: equipment.id.to_string(),
        type_label: equipment.equipment_type.label().to_string(),
        brand: equipment.brand,
        model: equipment.model,
        serial_number: equipment.serial_number,
        purchase_date: equipment.purchase_date.format("%Y-%m-%d").to_string(),
        warranty_expiry: equipment
            .warranty_expiry
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "No warranty".to_string()),
        location: equipment.location,
        status_label: equipment.status.label().to_string(),
        assigned_to,
        notes: equipment.notes,
        components,
        maintenance_logs,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

async fn assignee_options(state: &SharedState) -> Result<Vec<SelectOption>, AppError> {
    let mut opts = vec![SelectOption {
        value: String::new(),
        label: "Unassigned".to_string(),
    }];
    for profile in db::company_users::list_with_names(&state.pool).await? {
        opts.push(SelectOption {
            value: profile.id.to_string(),
            label: format!("{} ({})", profile.name, profile.department),
        });
    }
    Ok(opts)
}

pub async fn new_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let template = EquipmentFormTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        heading: "Add Equipment".to_string(),
        equipment_id: String::new(),
        type_options: options(&TYPE_OPTIONS),
        status_options: options(&STATUS_OPTIONS),
        assignee_options: assignee_options(&state).await?,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn edit_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let template = EquipmentFormTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        heading: format!("Edit {}", equipment.summary()),
        equipment_id: equipment.id.to_string(),
        type_options: options(&TYPE_OPTIONS),
        status_options: options(&STATUS_OPTIONS),
        assignee_options: assignee_options(&state).await?,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn confirm_delete_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let equipment = db::equipment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let template = ConfirmDeleteTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        id: equipment.id.to_string(),
        summary: equipment.summary(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
