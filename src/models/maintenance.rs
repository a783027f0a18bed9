use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Repair,
    Preventive,
    Incident,
    Upgrade,
    Installation,
    Configuration,
}

impl MaintenanceType {
    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Repair => "Repair",
            MaintenanceType::Preventive => "Preventive Maintenance",
            MaintenanceType::Incident => "Incident",
            MaintenanceType::Upgrade => "Update/Upgrade",
            MaintenanceType::Installation => "Installation",
            MaintenanceType::Configuration => "Configuration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePriority {
    High,
    Medium,
    Low,
}

impl MaintenancePriority {
    pub fn label(&self) -> &'static str {
        match self {
            MaintenancePriority::High => "High",
            MaintenancePriority::Medium => "Medium",
            MaintenancePriority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub title: String,
    pub description: String,
    pub technician_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub parts_used: String,
    pub cost: Option<Decimal>,
    pub priority: MaintenancePriority,
    pub resolution: String,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceLog {
    pub fn is_pending(&self) -> bool {
        self.end_date.is_none()
    }
}
