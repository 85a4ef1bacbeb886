use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for audit_logs table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
}

/// Audit action constants.
pub mod audit_action {
    pub const INVESTMENT_CREATED: &str = "INVESTMENT_CREATED";
    pub const INVESTMENT_MATURED: &str = "INVESTMENT_MATURED";
    pub const INVESTMENT_LIQUIDATED: &str = "INVESTMENT_LIQUIDATED";
    pub const SETTINGS_UPDATED: &str = "SETTINGS_UPDATED";
}
