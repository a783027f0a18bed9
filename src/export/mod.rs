pub mod csv;
pub mod pdf;
pub mod xlsx;

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Equipment, MaintenanceLog};

pub const EQUIPMENT_HEADERS: [&str; 10] = [
    "Type",
    "Brand",
    "Model",
    "Serial Number",
    "Purchase Date",
    "Warranty Expiry",
    "Location",
    "Status",
    "Assigned To",
    "Notes",
];

pub const MAINTENANCE_HEADERS: [&str; 10] = [
    "Equipment",
    "Type",
    "Title",
    "Technician",
    "Start Date",
    "End Date",
    "Cost",
    "Priority",
    "Description",
    "Resolution",
];

/// Flatten equipment rows into display cells shared by every export format.
pub fn equipment_rows(
    items: &[Equipment],
    assignee_names: &HashMap<Uuid, String>,
) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            vec![
                item.equipment_type.label().to_string(),
                item.brand.clone(),
                item.model.clone(),
                item.serial_number.clone(),
                item.purchase_date.format("%Y-%m-%d").to_string(),
                item.warranty_expiry
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                item.location.clone(),
                item.status.label().to_string(),
                item.assigned_to
                    .and_then(|id| assignee_names.get(&id).cloned())
                    .unwrap_or_else(|| "None".to_string()),
                item.notes.clone(),
            ]
        })
        .collect()
}

pub fn maintenance_rows(
    items: &[MaintenanceLog],
    equipment_summaries: &HashMap<Uuid, String>,
    technician_names: &HashMap<Uuid, String>,
) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            vec![
                equipment_summaries
                    .get(&item.equipment_id)
                    .cloned()
                    .unwrap_or_default(),
                item.maintenance_type.label().to_string(),
                item.title.clone(),
                technician_names
                    .get(&item.technician_id)
                    .cloned()
                    .unwrap_or_default(),
                item.start_date.format("%Y-%m-%d %H:%M").to_string(),
                item.end_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                item.cost.map(|c| c.to_string()).unwrap_or_default(),
                item.priority.label().to_string(),
                item.description.clone(),
                item.resolution.clone(),
            ]
        })
        .collect()
}
