use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Assigned,
    Unassigned,
    Repaired,
    Moved,
    StatusChanged,
}

/// A single append-only audit row. Never updated or deleted through the
/// application.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub model_name: String,
    pub object_id: Uuid,
    pub details: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}
