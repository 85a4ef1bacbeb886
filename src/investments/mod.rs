//! Investment domain rules: plan catalog, interest accrual, settlement math.
//!
//! Everything here is synchronous and side-effect free. Persistence and
//! transactions live in `services::investment_service`.

pub mod accrual;
pub mod plans;
pub mod settlement;
pub mod summary;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::errors::AppError;

pub use accrual::{accrual_fraction, accrued_interest};
pub use plans::{catalog, Plan, PlanType};
pub use settlement::{liquidation_settlement, maturity_settlement, Settlement};
pub use summary::{summarize, InvestmentSummary};

/// Business-rule violation on an investment operation.
#[derive(Debug, Error)]
pub enum InvestmentError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("amount must be positive")]
    AmountNotPositive,

    #[error("amount {amount} has more than 2 decimal places")]
    TooManyDecimals { amount: Decimal },

    #[error("amount {amount} is below the plan minimum of {min}")]
    BelowMinimum { amount: Decimal, min: Decimal },

    #[error("amount {amount} exceeds the plan maximum of {max}")]
    AboveMaximum { amount: Decimal, max: Decimal },

    #[error("insufficient balance: available {balance}, required {required}")]
    InsufficientBalance { balance: Decimal, required: Decimal },

    #[error("investment is {status}, only ACTIVE investments can be liquidated")]
    NotActive { status: String },

    #[error("investments are currently disabled")]
    Disabled,
}

/// Purchases are refused while the `investments_enabled` setting is off.
pub fn ensure_investments_enabled(enabled: bool) -> Result<(), InvestmentError> {
    if enabled {
        Ok(())
    } else {
        Err(InvestmentError::Disabled)
    }
}

impl From<InvestmentError> for AppError {
    fn from(e: InvestmentError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
