use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for transactions table (the wallet ledger).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub tx_type: String,
    pub direction: String,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub reference: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Ledger entry kinds.
pub mod tx_type {
    pub const INVESTMENT: &str = "INVESTMENT";
    pub const INVESTMENT_RETURN: &str = "INVESTMENT_RETURN";
    pub const INVESTMENT_LIQUIDATION: &str = "INVESTMENT_LIQUIDATION";
}

pub mod direction {
    pub const DEBIT: &str = "DEBIT";
    pub const CREDIT: &str = "CREDIT";
}
