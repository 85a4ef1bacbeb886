use rust_decimal::Decimal;
use serde::Serialize;

/// Penalty on early exit, as a fraction of the expected return.
pub const LIQUIDATION_PENALTY_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2); // 0.10

/// Amounts credited back to the wallet when an investment is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub principal: Decimal,
    pub interest: Decimal,
    pub penalty: Decimal,
    pub payout: Decimal,
}

/// Full-term settlement: principal plus the whole expected return.
pub fn maturity_settlement(amount: Decimal, expected_return: Decimal) -> Settlement {
    Settlement {
        principal: amount,
        interest: expected_return,
        penalty: Decimal::ZERO,
        payout: amount + expected_return,
    }
}

/// Early exit: the penalty is taken from the expected return, never the principal.
pub fn liquidation_settlement(amount: Decimal, expected_return: Decimal) -> Settlement {
    let penalty = (expected_return * LIQUIDATION_PENALTY_RATE).round_dp(2);
    Settlement {
        principal: amount,
        interest: expected_return - penalty,
        penalty,
        payout: amount + expected_return - penalty,
    }
}
