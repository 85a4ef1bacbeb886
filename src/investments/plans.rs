use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::InvestmentError;

/// Named investment tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanType {
    Basic,
    Standard,
    Premium,
    Vip,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::Basic,
        PlanType::Standard,
        PlanType::Premium,
        PlanType::Vip,
    ];

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BASIC" => Some(PlanType::Basic),
            "STANDARD" => Some(PlanType::Standard),
            "PREMIUM" => Some(PlanType::Premium),
            "VIP" => Some(PlanType::Vip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "BASIC",
            PlanType::Standard => "STANDARD",
            PlanType::Premium => "PREMIUM",
            PlanType::Vip => "VIP",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plan from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub plan_type: PlanType,
    pub name: &'static str,
    pub min_amount: Decimal,
    /// `None` means no upper bound.
    pub max_amount: Option<Decimal>,
    /// Return over the full term, in percent.
    pub roi: Decimal,
    pub duration_days: i32,
}

impl Plan {
    pub fn for_type(plan_type: PlanType) -> Plan {
        match plan_type {
            PlanType::Basic => Plan {
                plan_type,
                name: "Basic",
                min_amount: Decimal::from(1_000),
                max_amount: Some(Decimal::from(9_999)),
                roi: Decimal::from(5),
                duration_days: 30,
            },
            PlanType::Standard => Plan {
                plan_type,
                name: "Standard",
                min_amount: Decimal::from(10_000),
                max_amount: Some(Decimal::from(49_999)),
                roi: Decimal::from(8),
                duration_days: 60,
            },
            PlanType::Premium => Plan {
                plan_type,
                name: "Premium",
                min_amount: Decimal::from(50_000),
                max_amount: Some(Decimal::from(199_999)),
                roi: Decimal::from(12),
                duration_days: 90,
            },
            PlanType::Vip => Plan {
                plan_type,
                name: "VIP",
                min_amount: Decimal::from(200_000),
                max_amount: None,
                roi: Decimal::from(18),
                duration_days: 180,
            },
        }
    }

    /// Look a plan up by its API name (case-insensitive).
    pub fn lookup(name: &str) -> Result<Plan, InvestmentError> {
        PlanType::from_api_str(name)
            .map(Plan::for_type)
            .ok_or_else(|| InvestmentError::InvalidPlan(name.to_string()))
    }

    /// Bounds are inclusive on both ends. Amounts must fit the 2-dp money
    /// columns exactly, otherwise the stored principal and the wallet debit
    /// would round apart.
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), InvestmentError> {
        if amount <= Decimal::ZERO {
            return Err(InvestmentError::AmountNotPositive);
        }
        if amount.normalize().scale() > 2 {
            return Err(InvestmentError::TooManyDecimals { amount });
        }
        if amount < self.min_amount {
            return Err(InvestmentError::BelowMinimum {
                amount,
                min: self.min_amount,
            });
        }
        if let Some(max) = self.max_amount {
            if amount > max {
                return Err(InvestmentError::AboveMaximum { amount, max });
            }
        }
        Ok(())
    }

    /// Fixed interest over the whole term: amount × roi / 100.
    pub fn expected_return(&self, amount: Decimal) -> Decimal {
        (amount * self.roi / Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// The full catalog, in tier order.
pub fn catalog() -> Vec<Plan> {
    PlanType::ALL.iter().copied().map(Plan::for_type).collect()
}
