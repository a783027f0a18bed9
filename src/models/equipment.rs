use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "equipment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Laptop,
    Desktop,
    Monitor,
    Printer,
    NetworkDevice,
    Server,
    Phone,
    Tablet,
    Other,
}

impl EquipmentType {
    pub fn label(&self) -> &'static str {
        match self {
            EquipmentType::Laptop => "Laptop",
            EquipmentType::Desktop => "Desktop",
            EquipmentType::Monitor => "Monitor",
            EquipmentType::Printer => "Printer",
            EquipmentType::NetworkDevice => "Network Device",
            EquipmentType::Server => "Server",
            EquipmentType::Phone => "Phone",
            EquipmentType::Tablet => "Tablet",
            EquipmentType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "equipment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    InUse,
    InRepair,
    Retired,
    Lost,
    Disposed,
}

impl EquipmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "Available",
            EquipmentStatus::InUse => "In Use",
            EquipmentStatus::InRepair => "In Repair",
            EquipmentStatus::Retired => "Retired",
            EquipmentStatus::Lost => "Lost",
            EquipmentStatus::Disposed => "Disposed",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub equipment_type: EquipmentType,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: String,
    pub status: EquipmentStatus,
    pub assigned_to: Option<Uuid>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// "Laptop - Dell XPS 13 (SN-1234)", the display form used in audit
    /// details and notification emails.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} {} ({})",
            self.equipment_type.label(),
            self.brand,
            self.model,
            self.serial_number
        )
    }
}
