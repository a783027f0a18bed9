use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::tickets::{TicketFilter, TicketSort};
use crate::db::SortOrder;
use crate::error::AppError;
use crate::models::{TicketPriority, TicketStatus};
use crate::state::SharedState;
use crate::views::SelectOption;

const PRIORITY_OPTIONS: [(&str, &str); 4] = [
    ("low", "Low"),
    ("medium", "Medium"),
    ("high", "High"),
    ("critical", "Critical"),
];

const STATUS_OPTIONS: [(&str, &str); 4] = [
    ("open", "Open"),
    ("in_progress", "In Progress"),
    ("resolved", "Resolved"),
    ("closed", "Closed"),
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
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "crate::routes::empty_string_as_none")]
    pub priority: Option<TicketPriority>,
}

#[derive(Template)]
#[template(path = "tickets/list.html")]
#[allow(dead_code)]
struct TicketListTemplate {
    user_name: String,
    is_admin: bool,
    tickets: Vec<TicketRow>,
    status_filter: String,
    priority_filter: String,
    status_options: Vec<SelectOption>,
    priority_options: Vec<SelectOption>,
}

#[allow(dead_code)]
struct TicketRow {
    id: String,
    title: String,
    priority_label: String,
    status_label: String,
    created_by: String,
    assigned_to: String,
    created_at: String,
}

#[derive(Template)]
#[template(path = "tickets/detail.html")]
#[allow(dead_code)]
struct TicketDetailTemplate {
    user_name: String,
    is_admin: bool,
    id: String,
    title: String,
    description: String,
    priority_label: String,
    status_label: String,
    is_closed: bool,
    created_by: String,
    assigned_to: String,
    equipment: String,
    resolution: String,
    created_at: String,
    technician_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "tickets/form.html")]
#[allow(dead_code)]
struct TicketFormTemplate {
    user_name: String,
    is_admin: bool,
    priority_options: Vec<SelectOption>,
    equipment_options: Vec<SelectOption>,
}

async fn user_name(state: &SharedState, auth: &AuthUser) -> Result<String, AppError> {
    Ok(db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default())
}

async fn profile_name(state: &SharedState, id: Option<Uuid>) -> Result<String, AppError> {
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
    let filter = TicketFilter {
        q: None,
        status: query.status,
        priority: query.priority,
        assigned_to: None,
        sort_by: TicketSort::CreatedAt,
        sort_order: SortOrder::Desc,
        limit: 100,
        offset: 0,
    };

    let mut rows = Vec::new();
    for ticket in db::tickets::list(&state.pool, &filter).await? {
        let created_by = profile_name(&state, Some(ticket.created_by)).await?;
        let assigned_to = profile_name(&state, ticket.assigned_to).await?;
        rows.push(TicketRow {
            id: ticket.id.to_string(),
            title: ticket.title,
            priority_label: ticket.priority.label().to_string(),
            status_label: ticket.status.label().to_string(),
            created_by,
            assigned_to,
            created_at: ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
        });
    }

    let template = TicketListTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        tickets: rows,
        status_filter: query
            .status
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        priority_filter: query
            .priority
            .map(|p| p.label().to_string())
            .unwrap_or_default(),
        status_options: options(&STATUS_OPTIONS),
        priority_options: options(&PRIORITY_OPTIONS),
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn detail_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = db::tickets::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let equipment = match ticket.equipment_id {
        Some(equipment_id) => db::equipment::find_by_id(&state.pool, equipment_id)
            .await?
            .map(|e| e.summary())
            .unwrap_or_default(),
        None => "None".to_string(),
    };

    let mut technician_options = Vec::new();
    for profile in db::company_users::list_with_names(&state.pool).await? {
        technician_options.push(SelectOption {
            value: profile.id.to_string(),
            label: format!("{} ({})", profile.name, profile.department),
        });
    }

    let created_by = profile_name(&state, Some(ticket.created_by)).await?;
    let assigned_to = profile_name(&state, ticket.assigned_to).await?;

    let template = TicketDetailTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        id: ticket.id.to_string(),
        title: ticket.title,
        description: ticket.description,
        priority_label: ticket.priority.label().to_string(),
        status_label: ticket.status.label().to_string(),
        is_closed: ticket.status == TicketStatus::Closed,
        created_by,
        assigned_to,
        equipment,
        resolution: ticket.resolution,
        created_at: ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
        technician_options,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn new_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let mut equipment_options = vec![SelectOption {
        value: String::new(),
        label: "None".to_string(),
    }];
    for item in db::equipment::list_all(&state.pool).await? {
        equipment_options.push(SelectOption {
            value: item.id.to_string(),
            label: item.summary(),
        });
    }

    let template = TicketFormTemplate {
        user_name: user_name(&state, &auth).await?,
        is_admin: auth.is_admin,
        priority_options: options(&PRIORITY_OPTIONS),
        equipment_options,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
