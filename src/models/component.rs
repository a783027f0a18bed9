use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub component_type: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub specifications: String,
    pub installed_date: NaiveDate,
}
