use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AuditAction;

/// Append an audit entry. Called explicitly in handlers after mutations.
/// Best-effort: a failed write is logged and swallowed so it never fails
/// the originating request.
pub async fn log_event(
    pool: &PgPool,
    actor_id: Option<Uuid>,
    action: AuditAction,
    model_name: &str,
    object_id: Uuid,
    details: &str,
    ip_address: Option<&str>,
) {
    if let Err(e) = crate::db::audit::append(
        pool,
        actor_id,
        action,
        model_name,
        object_id,
        details,
        ip_address,
    )
    .await
    {
        tracing::error!("Failed to write audit entry: {e}");
    }
}
