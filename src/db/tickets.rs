use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::SortOrder;
use crate::models::{SupportTicket, TicketPriority, TicketStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSort {
    CreatedAt,
    UpdatedAt,
    Priority,
}

impl TicketSort {
    pub fn parse(s: &str) -> Self {
        match s {
            "updated_at" => TicketSort::UpdatedAt,
            "priority" => TicketSort::Priority,
            _ => TicketSort::CreatedAt,
        }
    }

    fn column(self) -> &'static str {
        match self {
            TicketSort::CreatedAt => "created_at",
            TicketSort::UpdatedAt => "updated_at",
            TicketSort::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TicketFilter {
    pub q: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<Uuid>,
    pub sort_by: TicketSort,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, f: &TicketFilter) {
    if let Some(q) = &f.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(s) = f.status {
        qb.push(" AND status = ").push_bind(s);
    }
    if let Some(p) = f.priority {
        qb.push(" AND priority = ").push_bind(p);
    }
    if let Some(a) = f.assigned_to {
        qb.push(" AND assigned_to = ").push_bind(a);
    }
}

pub async fn list(pool: &PgPool, f: &TicketFilter) -> Result<Vec<SupportTicket>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM support_tickets WHERE 1=1");
    push_filters(&mut qb, f);
    qb.push(format!(
        " ORDER BY {} {}",
        f.sort_by.column(),
        f.sort_order.keyword()
    ));
    qb.push(" LIMIT ")
        .push_bind(f.limit)
        .push(" OFFSET ")
        .push_bind(f.offset);
    qb.build_query_as::<SupportTicket>().fetch_all(pool).await
}

pub async fn count(pool: &PgPool, f: &TicketFilter) -> Result<i64, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM support_tickets WHERE 1=1");
    push_filters(&mut qb, f);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SupportTicket>, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    title: &str,
    description: &str,
    created_by: Uuid,
    priority: TicketPriority,
    equipment_id: Option<Uuid>,
) -> Result<SupportTicket, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>(
        "INSERT INTO support_tickets (title, description, created_by, priority, equipment_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(title)
    .bind(description)
    .bind(created_by)
    .bind(priority)
    .bind(equipment_id)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    description: &str,
    priority: TicketPriority,
    status: TicketStatus,
    assigned_to: Option<Uuid>,
    resolution: &str,
) -> Result<SupportTicket, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>(
        "UPDATE support_tickets SET
            title = $2, description = $3, priority = $4, status = $5,
            assigned_to = $6, resolution = $7, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(priority)
    .bind(status)
    .bind(assigned_to)
    .bind(resolution)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM support_tickets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn assign(
    pool: &PgPool,
    id: Uuid,
    technician_id: Uuid,
    status: TicketStatus,
) -> Result<SupportTicket, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>(
        "UPDATE support_tickets SET assigned_to = $2, status = $3, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(technician_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn close(
    pool: &PgPool,
    id: Uuid,
    resolution: &str,
) -> Result<SupportTicket, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>(
        "UPDATE support_tickets SET status = 'closed', resolution = $2, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(resolution)
    .fetch_one(pool)
    .await
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<SupportTicket>, sqlx::Error> {
    sqlx::query_as::<_, SupportTicket>(
        "SELECT * FROM support_tickets ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
