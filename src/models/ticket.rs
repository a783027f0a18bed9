use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Closed is terminal; everything else may move forward, and resolved
    /// tickets may be reopened into in_progress.
    pub fn can_transition(self, to: TicketStatus) -> bool {
        use TicketStatus::*;
        match (self, to) {
            (a, b) if a == b => true,
            (Open, InProgress) | (Open, Resolved) | (Open, Closed) => true,
            (InProgress, Open) | (InProgress, Resolved) | (InProgress, Closed) => true,
            (Resolved, InProgress) | (Resolved, Closed) => true,
            (Closed, _) => false,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub equipment_id: Option<Uuid>,
    pub resolution: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::TicketStatus::*;

    #[test]
    fn closed_is_terminal() {
        assert!(!Closed.can_transition(Open));
        assert!(!Closed.can_transition(InProgress));
        assert!(!Closed.can_transition(Resolved));
    }

    #[test]
    fn same_status_is_allowed() {
        for s in [Open, InProgress, Resolved, Closed] {
            assert!(s.can_transition(s));
        }
    }

    #[test]
    fn resolved_can_reopen_but_not_to_open() {
        assert!(Resolved.can_transition(InProgress));
        assert!(!Resolved.can_transition(Open));
    }
}
