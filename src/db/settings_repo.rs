use std::collections::HashMap;
use sqlx::{PgConnection, PgPool};

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
}

/// Get all system settings.
pub async fn get_all_settings(pool: &PgPool) -> anyhow::Result<Vec<SystemSetting>> {
    let rows = sqlx::query_as::<_, SystemSetting>(
        "SELECT key, value FROM system_settings ORDER BY key",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_setting(pool: &PgPool, key: &str) -> anyhow::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM system_settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(v,)| v))
}

/// Read a boolean setting, falling back to `default` when unset or unparsable.
pub async fn get_bool_setting(pool: &PgPool, key: &str, default: bool) -> anyhow::Result<bool> {
    Ok(get_setting(pool, key)
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or(default))
}

/// Batch upsert settings. Run inside the caller's transaction so the
/// audit entry commits with the change.
pub async fn upsert_settings(
    conn: &mut PgConnection,
    entries: &HashMap<String, String>,
) -> anyhow::Result<()> {
    for (key, value) in entries {
        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
