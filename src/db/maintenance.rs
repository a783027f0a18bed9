use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::SortOrder;
use crate::models::{MaintenanceLog, MaintenancePriority, MaintenanceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceSort {
    StartDate,
    EndDate,
    CreatedAt,
}

impl MaintenanceSort {
    pub fn parse(s: &str) -> Self {
        match s {
            "end_date" => MaintenanceSort::EndDate,
            "created_at" => MaintenanceSort::CreatedAt,
            _ => MaintenanceSort::StartDate,
        }
    }

    fn column(self) -> &'static str {
        match self {
            MaintenanceSort::StartDate => "m.start_date",
            MaintenanceSort::EndDate => "m.end_date",
            MaintenanceSort::CreatedAt => "m.created_at",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceFilter {
    pub q: Option<String>,
    pub maintenance_type: Option<MaintenanceType>,
    pub priority: Option<MaintenancePriority>,
    pub technician_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub sort_by: MaintenanceSort,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, f: &MaintenanceFilter) {
    if let Some(q) = &f.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (m.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR e.serial_number ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(t) = f.maintenance_type {
        qb.push(" AND m.maintenance_type = ").push_bind(t);
    }
    if let Some(p) = f.priority {
        qb.push(" AND m.priority = ").push_bind(p);
    }
    if let Some(tech) = f.technician_id {
        qb.push(" AND m.technician_id = ").push_bind(tech);
    }
    if let Some(eq) = f.equipment_id {
        qb.push(" AND m.equipment_id = ").push_bind(eq);
    }
}

pub async fn list(pool: &PgPool, f: &MaintenanceFilter) -> Result<Vec<MaintenanceLog>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT m.* FROM maintenance_logs m JOIN equipment e ON e.id = m.equipment_id WHERE 1=1",
    );
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
    qb.build_query_as::<MaintenanceLog>().fetch_all(pool).await
}

pub async fn count(pool: &PgPool, f: &MaintenanceFilter) -> Result<i64, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT COUNT(*) FROM maintenance_logs m JOIN equipment e ON e.id = m.equipment_id WHERE 1=1",
    );
    push_filters(&mut qb, f);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MaintenanceLog>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>("SELECT * FROM maintenance_logs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_equipment(
    pool: &PgPool,
    equipment_id: Uuid,
) -> Result<Vec<MaintenanceLog>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>(
        "SELECT * FROM maintenance_logs WHERE equipment_id = $1 ORDER BY start_date DESC",
    )
    .bind(equipment_id)
    .fetch_all(pool)
    .await
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<MaintenanceLog>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>(
        "SELECT * FROM maintenance_logs ORDER BY start_date DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    equipment_id: Uuid,
    maintenance_type: MaintenanceType,
    title: &str,
    description: &str,
    technician_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    parts_used: &str,
    cost: Option<Decimal>,
    priority: MaintenancePriority,
    resolution: &str,
) -> Result<MaintenanceLog, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>(
        "INSERT INTO maintenance_logs
            (equipment_id, maintenance_type, title, description, technician_id,
             start_date, end_date, parts_used, cost, priority, resolution)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
    )
    .bind(equipment_id)
    .bind(maintenance_type)
    .bind(title)
    .bind(description)
    .bind(technician_id)
    .bind(start_date)
    .bind(end_date)
    .bind(parts_used)
    .bind(cost)
    .bind(priority)
    .bind(resolution)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    maintenance_type: MaintenanceType,
    title: &str,
    description: &str,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    parts_used: &str,
    cost: Option<Decimal>,
    priority: MaintenancePriority,
    resolution: &str,
) -> Result<MaintenanceLog, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>(
        "UPDATE maintenance_logs SET
            maintenance_type = $2, title = $3, description = $4, start_date = $5,
            end_date = $6, parts_used = $7, cost = $8, priority = $9, resolution = $10
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(maintenance_type)
    .bind(title)
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(parts_used)
    .bind(cost)
    .bind(priority)
    .bind(resolution)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Set the end date if the log is still pending. Completed logs keep their
/// original end date, which makes re-completion idempotent.
pub async fn complete(pool: &PgPool, id: Uuid) -> Result<Option<MaintenanceLog>, sqlx::Error> {
    let updated = sqlx::query_as::<_, MaintenanceLog>(
        "UPDATE maintenance_logs SET end_date = now()
         WHERE id = $1 AND end_date IS NULL RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(log) => Ok(Some(log)),
        None => find_by_id(pool, id).await,
    }
}

pub async fn pending_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_logs WHERE end_date IS NULL")
        .fetch_one(pool)
        .await
}

/// Open repair logs for one equipment item, excluding the given log. Used to
/// decide whether completing a repair releases the item from `in_repair`.
pub async fn other_pending_repairs(
    pool: &PgPool,
    equipment_id: Uuid,
    exclude: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM maintenance_logs
         WHERE equipment_id = $1 AND id <> $2
           AND maintenance_type = 'repair' AND end_date IS NULL",
    )
    .bind(equipment_id)
    .bind(exclude)
    .fetch_one(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<MaintenanceLog>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceLog>(
        "SELECT * FROM maintenance_logs ORDER BY start_date DESC",
    )
    .fetch_all(pool)
    .await
}
