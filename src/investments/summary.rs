use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::accrual::accrued_interest;
use crate::models::investment::investment_status;
use crate::models::Investment;

/// Portfolio roll-up for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvestmentSummary {
    /// Principal currently locked in ACTIVE investments.
    pub total_invested: Decimal,
    pub active_count: i64,
    pub matured_count: i64,
    pub liquidated_count: i64,
    pub total_expected_return: Decimal,
    pub total_accrued_interest: Decimal,
    /// Interest actually credited by settled investments (payout − principal).
    pub total_returns_paid: Decimal,
}

pub fn summarize(investments: &[Investment], now: DateTime<Utc>) -> InvestmentSummary {
    let mut summary = InvestmentSummary::default();

    for inv in investments {
        match inv.status.as_str() {
            investment_status::ACTIVE => {
                summary.active_count += 1;
                summary.total_invested += inv.amount;
                summary.total_expected_return += inv.expected_return;
                summary.total_accrued_interest += accrued_interest(inv, now);
            }
            investment_status::MATURED => summary.matured_count += 1,
            investment_status::LIQUIDATED => summary.liquidated_count += 1,
            other => {
                tracing::warn!(investment_id = %inv.id, status = other, "Unknown investment status");
            }
        }

        if let Some(payout) = inv.payout {
            summary.total_returns_paid += payout - inv.amount;
        }
    }

    summary.total_accrued_interest = summary.total_accrued_interest.round_dp(2);
    summary.total_accrued_interest.rescale(2);
    summary
}
