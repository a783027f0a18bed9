use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::{
    Equipment, EquipmentStatus, EquipmentType, MaintenanceType, TicketPriority, TicketStatus,
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TypeCount {
    pub equipment_type: EquipmentType,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: EquipmentStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocationCount {
    pub location: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthCount {
    pub month: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyCost {
    pub month: NaiveDate,
    pub count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MaintenanceTypeCost {
    pub maintenance_type: MaintenanceType,
    pub count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TechnicianCost {
    pub technician: String,
    pub count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CostSummary {
    pub total_maintenance: i64,
    pub total_cost: Decimal,
    pub avg_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TicketStatusCount {
    pub status: TicketStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TicketPriorityCount {
    pub priority: TicketPriority,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AssigneeCount {
    pub assignee: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Disjoint warranty buckets: every equipment row lands in exactly one.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WarrantyCounts {
    pub active: i64,
    pub expiring_soon: i64,
    pub expired: i64,
    pub no_warranty: i64,
}

pub async fn equipment_by_type(pool: &PgPool) -> Result<Vec<TypeCount>, sqlx::Error> {
    sqlx::query_as::<_, TypeCount>(
        "SELECT equipment_type, COUNT(*) AS count FROM equipment
         GROUP BY equipment_type ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn equipment_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
    sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM equipment
         GROUP BY status ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn equipment_by_location(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<LocationCount>, sqlx::Error> {
    sqlx::query_as::<_, LocationCount>(
        "SELECT location, COUNT(*) AS count FROM equipment
         GROUP BY location ORDER BY count DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn equipment_count_by_status(
    pool: &PgPool,
    status: EquipmentStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment WHERE status = $1")
        .bind(status)
        .fetch_one(pool)
        .await
}

pub async fn equipment_total(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment")
        .fetch_one(pool)
        .await
}

/// Monthly count of purchases inside the window.
pub async fn acquisition_timeline(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MonthCount>, sqlx::Error> {
    sqlx::query_as::<_, MonthCount>(
        "SELECT date_trunc('month', purchase_date)::date AS month, COUNT(*) AS count
         FROM equipment
         WHERE purchase_date >= $1 AND purchase_date <= $2
         GROUP BY 1 ORDER BY 1",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn maintenance_cost_summary(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<CostSummary, sqlx::Error> {
    sqlx::query_as::<_, CostSummary>(
        "SELECT COUNT(*) AS total_maintenance,
                COALESCE(SUM(cost), 0) AS total_cost,
                AVG(cost) AS avg_cost
         FROM maintenance_logs
         WHERE start_date >= $1 AND start_date < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

pub async fn maintenance_by_type(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<MaintenanceTypeCost>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceTypeCost>(
        "SELECT maintenance_type, COUNT(*) AS count, COALESCE(SUM(cost), 0) AS total_cost
         FROM maintenance_logs
         WHERE start_date >= $1 AND start_date < $2
         GROUP BY maintenance_type ORDER BY total_cost DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn maintenance_by_technician(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<TechnicianCost>, sqlx::Error> {
    sqlx::query_as::<_, TechnicianCost>(
        "SELECT u.name AS technician, COUNT(*) AS count, COALESCE(SUM(m.cost), 0) AS total_cost
         FROM maintenance_logs m
         JOIN company_users c ON c.id = m.technician_id
         JOIN users u ON u.id = c.user_id
         WHERE m.start_date >= $1 AND m.start_date < $2
         GROUP BY u.name ORDER BY total_cost DESC LIMIT $3",
    )
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn monthly_cost_trend(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<MonthlyCost>, sqlx::Error> {
    sqlx::query_as::<_, MonthlyCost>(
        "SELECT date_trunc('month', start_date)::date AS month,
                COUNT(*) AS count,
                COALESCE(SUM(cost), 0) AS total_cost
         FROM maintenance_logs
         WHERE start_date >= $1 AND start_date < $2
         GROUP BY 1 ORDER BY 1",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn tickets_by_status(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TicketStatusCount>, sqlx::Error> {
    sqlx::query_as::<_, TicketStatusCount>(
        "SELECT status, COUNT(*) AS count FROM support_tickets
         WHERE created_at >= $1 AND created_at < $2
         GROUP BY status ORDER BY count DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn tickets_by_priority(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TicketPriorityCount>, sqlx::Error> {
    sqlx::query_as::<_, TicketPriorityCount>(
        "SELECT priority, COUNT(*) AS count FROM support_tickets
         WHERE created_at >= $1 AND created_at < $2
         GROUP BY priority ORDER BY count DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn tickets_by_assignee(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<AssigneeCount>, sqlx::Error> {
    sqlx::query_as::<_, AssigneeCount>(
        "SELECT u.name AS assignee, COUNT(*) AS count
         FROM support_tickets t
         JOIN company_users c ON c.id = t.assigned_to
         JOIN users u ON u.id = c.user_id
         WHERE t.created_at >= $1 AND t.created_at < $2
         GROUP BY u.name ORDER BY count DESC LIMIT $3",
    )
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Mean hours from creation to the last update of resolved/closed tickets.
pub async fn avg_resolution_hours(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<f64>>(
        "SELECT AVG(EXTRACT(EPOCH FROM (updated_at - created_at)) / 3600.0)::double precision
         FROM support_tickets
         WHERE status IN ('resolved', 'closed')
           AND created_at >= $1 AND created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

pub async fn ticket_daily_trend(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DailyCount>, sqlx::Error> {
    sqlx::query_as::<_, DailyCount>(
        "SELECT created_at::date AS day, COUNT(*) AS count
         FROM support_tickets
         WHERE created_at >= $1 AND created_at < $2
         GROUP BY 1 ORDER BY 1",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn open_ticket_count(
    pool: &PgPool,
    status: TicketStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM support_tickets WHERE status = $1")
        .bind(status)
        .fetch_one(pool)
        .await
}

pub async fn critical_open_ticket_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM support_tickets
         WHERE priority = 'critical' AND status IN ('open', 'in_progress')",
    )
    .fetch_one(pool)
    .await
}

/// One pass over the table; the four FILTER clauses are mutually exclusive
/// and cover every row.
pub async fn warranty_counts(
    pool: &PgPool,
    today: NaiveDate,
    horizon: NaiveDate,
) -> Result<WarrantyCounts, sqlx::Error> {
    sqlx::query_as::<_, WarrantyCounts>(
        "SELECT
            COUNT(*) FILTER (WHERE warranty_expiry > $2) AS active,
            COUNT(*) FILTER (WHERE warranty_expiry >= $1 AND warranty_expiry <= $2) AS expiring_soon,
            COUNT(*) FILTER (WHERE warranty_expiry < $1) AS expired,
            COUNT(*) FILTER (WHERE warranty_expiry IS NULL) AS no_warranty
         FROM equipment",
    )
    .bind(today)
    .bind(horizon)
    .fetch_one(pool)
    .await
}

pub async fn warranty_expiring_between(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Equipment>, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        "SELECT * FROM equipment
         WHERE warranty_expiry >= $1 AND warranty_expiry <= $2
         ORDER BY warranty_expiry",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn warranty_expiring_count(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM equipment WHERE warranty_expiry >= $1 AND warranty_expiry <= $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await
}
