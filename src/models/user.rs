use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for users table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// User role constants.
pub mod user_role {
    pub const USER: &str = "USER";
    pub const ADMIN: &str = "ADMIN";
}
