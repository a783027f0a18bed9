use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AuditAction, AuditLogEntry};

/// Append one audit row. The table is append-only; no update or delete
/// functions exist in this module.
pub async fn append(
    pool: &PgPool,
    actor_id: Option<Uuid>,
    action: AuditAction,
    model_name: &str,
    object_id: Uuid,
    details: &str,
    ip_address: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (actor_id, action, model_name, object_id, details, ip_address)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(actor_id)
    .bind(action)
    .bind(model_name)
    .bind(object_id)
    .bind(details)
    .bind(ip_address)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditLogEntry>(
        "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_log")
        .fetch_one(pool)
        .await
}

pub async fn count_for_object(
    pool: &PgPool,
    model_name: &str,
    object_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM audit_log WHERE model_name = $1 AND object_id = $2",
    )
    .bind(model_name)
    .bind(object_id)
    .fetch_one(pool)
    .await
}
