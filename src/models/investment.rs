use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for investments table.
///
/// `expected_return` is fixed when the row is inserted. Settlement only
/// writes `status`, `payout`, `penalty` and `settled_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub plan_type: String,
    pub amount: Decimal,
    pub roi: Decimal,
    pub expected_return: Decimal,
    pub duration_days: i32,
    pub start_date: DateTime<Utc>,
    pub maturity_date: DateTime<Utc>,
    pub status: String,
    pub payout: Option<Decimal>,
    pub penalty: Option<Decimal>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Investment {
    pub fn is_active(&self) -> bool {
        self.status == investment_status::ACTIVE
    }
}

/// Investment status constants.
pub mod investment_status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const MATURED: &str = "MATURED";
    pub const LIQUIDATED: &str = "LIQUIDATED";
}

/// Investment plus its read-time accrued interest, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub accrued_interest: Decimal,
}
