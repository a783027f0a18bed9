pub mod auth;
pub mod backups;
pub mod dashboard;
pub mod equipment;
pub mod maintenance;
pub mod reports;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// A value/label pair for select inputs.
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/", get(auth::login_page))
        .route("/auth/login", get(auth::login_page))
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        // Equipment
        .route("/equipment", get(equipment::list_page))
        .route("/equipment/new", get(equipment::new_page))
        .route("/equipment/{id}", get(equipment::detail_page))
        .route("/equipment/{id}/edit", get(equipment::edit_page))
        .route("/equipment/{id}/delete", get(equipment::confirm_delete_page))
        .route(
            "/equipment/{id}/maintenance/new",
            get(maintenance::new_page),
        )
        // Support tickets
        .route("/support/tickets", get(tickets::list_page))
        .route("/support/tickets/new", get(tickets::new_page))
        .route("/support/tickets/{id}", get(tickets::detail_page))
        // Reports & backups
        .route("/reports", get(reports::index))
        .route("/backups", get(backups::list_page))
}
