use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::AuditLog;

/// Append an audit entry. `user_id` is `None` for system actions (the sweep).
pub async fn insert_audit_log(
    conn: &mut PgConnection,
    user_id: Option<Uuid>,
    action: &str,
    entity_type: &str,
    entity_id: Option<Uuid>,
    details: serde_json::Value,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, action, entity_type, entity_id, details)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn get_recent_audit_logs(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<AuditLog>> {
    let rows = sqlx::query_as::<_, AuditLog>(
        "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_audit_logs_for_entity(
    pool: &PgPool,
    entity_id: Uuid,
) -> anyhow::Result<Vec<AuditLog>> {
    let rows = sqlx::query_as::<_, AuditLog>(
        "SELECT * FROM audit_logs WHERE entity_id = $1 ORDER BY created_at ASC",
    )
    .bind(entity_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
