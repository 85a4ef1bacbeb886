use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::Investment;

/// Interest "earned so far" on an investment, for display only.
///
/// Linear between `start_date` and `maturity_date`, clamped to
/// `[0, expected_return]`. Non-ACTIVE investments report zero: their
/// funds were already settled and nothing is accruing any more.
pub fn accrued_interest(investment: &Investment, now: DateTime<Utc>) -> Decimal {
    if !investment.is_active() {
        return Decimal::ZERO;
    }

    investment.expected_return
        * accrual_fraction(investment.start_date, investment.maturity_date, now)
}

/// Fraction of the term elapsed at `now`, in `[0, 1]`.
///
/// Computed on millisecond durations with exact decimal division so the
/// result is monotone in `now` and hits 0 and 1 exactly at the ends.
pub fn accrual_fraction(
    start: DateTime<Utc>,
    maturity: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Decimal {
    let total_ms = (maturity - start).num_milliseconds();
    let elapsed_ms = (now - start).num_milliseconds();

    if elapsed_ms <= 0 {
        return Decimal::ZERO;
    }
    if elapsed_ms >= total_ms {
        return Decimal::ONE;
    }

    Decimal::from(elapsed_ms) / Decimal::from(total_ms)
}
