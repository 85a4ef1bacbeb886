use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::transaction_repo::NewTransaction;
use crate::db::investment_repo::NewInvestment;
use crate::db::{audit_repo, investment_repo, settings_repo, transaction_repo, wallet_repo};
use crate::errors::AppError;
use crate::investments::{
    accrued_interest, ensure_investments_enabled, liquidation_settlement, maturity_settlement,
    summarize, InvestmentError, InvestmentSummary, Plan, Settlement,
};
use crate::models::audit::audit_action;
use crate::models::investment::investment_status;
use crate::models::transaction::{direction, tx_type};
use crate::models::{Investment, InvestmentView, Transaction};

/// System setting that gates new purchases.
pub const INVESTMENTS_ENABLED_KEY: &str = "investments_enabled";

const ENTITY_INVESTMENT: &str = "investment";

/// Attach the read-time accrual to an investment row.
pub fn to_view(investment: Investment, now: DateTime<Utc>) -> InvestmentView {
    let mut accrued = accrued_interest(&investment, now).round_dp(2);
    accrued.rescale(2);
    InvestmentView {
        investment,
        accrued_interest: accrued,
    }
}

/// Buy into a plan: debit the wallet, record the ledger row and open an
/// ACTIVE investment, all in one transaction.
pub async fn create_investment(
    pool: &PgPool,
    user_id: Uuid,
    plan_name: &str,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Investment, AppError> {
    let enabled = settings_repo::get_bool_setting(pool, INVESTMENTS_ENABLED_KEY, true).await?;
    open_investment(pool, enabled, user_id, plan_name, amount, now).await
}

/// Same as [`create_investment`] with the `investments_enabled` setting
/// already resolved by the caller.
pub async fn open_investment(
    pool: &PgPool,
    investments_enabled: bool,
    user_id: Uuid,
    plan_name: &str,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Investment, AppError> {
    let plan = Plan::lookup(plan_name)?;
    plan.validate_amount(amount)?;
    ensure_investments_enabled(investments_enabled)?;

    let mut tx = pool.begin().await?;

    let wallet = wallet_repo::lock_wallet_by_user(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("wallet not found".into()))?;

    if wallet.balance < amount {
        return Err(InvestmentError::InsufficientBalance {
            balance: wallet.balance,
            required: amount,
        }
        .into());
    }

    let expected_return = plan.expected_return(amount);
    let investment = investment_repo::insert_investment(
        &mut *tx,
        &NewInvestment {
            user_id,
            wallet_id: wallet.id,
            plan_type: plan.plan_type.as_str(),
            amount,
            roi: plan.roi,
            expected_return,
            duration_days: plan.duration_days,
            start_date: now,
            maturity_date: now + Duration::days(i64::from(plan.duration_days)),
        },
    )
    .await?;

    let wallet = wallet_repo::adjust_balance(&mut *tx, wallet.id, -amount).await?;

    transaction_repo::insert_transaction(
        &mut *tx,
        &NewTransaction {
            user_id,
            wallet_id: wallet.id,
            tx_type: tx_type::INVESTMENT,
            direction: direction::DEBIT,
            amount,
            balance_after: wallet.balance,
            reference: Some(investment.id),
            description: format!("{} plan investment", plan.name),
        },
    )
    .await?;

    audit_repo::insert_audit_log(
        &mut *tx,
        Some(user_id),
        audit_action::INVESTMENT_CREATED,
        ENTITY_INVESTMENT,
        Some(investment.id),
        json!({
            "plan": plan.plan_type,
            "amount": amount,
            "expected_return": expected_return,
            "maturity_date": investment.maturity_date,
        }),
    )
    .await?;

    tx.commit().await?;

    metrics::counter!("investments_created_total").increment(1);
    tracing::info!(
        investment_id = %investment.id,
        user_id = %user_id,
        plan = %plan.plan_type,
        amount = %amount,
        expected_return = %expected_return,
        "Investment created"
    );

    Ok(investment)
}

/// Early exit from an ACTIVE investment. The caller must own it.
///
/// An investment already past its maturity date that the sweep has not
/// reached yet is settled as MATURED with the full return instead of
/// being penalised.
pub async fn liquidate_investment(
    pool: &PgPool,
    user_id: Uuid,
    investment_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(Investment, Settlement), AppError> {
    let mut tx = pool.begin().await?;

    let investment = investment_repo::lock_investment(&mut *tx, investment_id)
        .await?
        .filter(|inv| inv.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("investment not found".into()))?;

    if !investment.is_active() {
        return Err(InvestmentError::NotActive {
            status: investment.status,
        }
        .into());
    }

    let due = investment.maturity_date <= now;
    let outcome = if due {
        settle_matured(&mut *tx, &investment, Some(user_id)).await?
    } else {
        settle_liquidated(&mut *tx, &investment).await?
    };
    let (settled, settlement) = outcome.ok_or_else(|| InvestmentError::NotActive {
        status: investment.status.clone(),
    })?;

    tx.commit().await?;

    if due {
        metrics::counter!("investments_matured_total").increment(1);
        tracing::info!(
            investment_id = %settled.id,
            user_id = %user_id,
            payout = %settlement.payout,
            "Liquidation requested after maturity, settled as matured"
        );
    } else {
        metrics::counter!("investments_liquidated_total").increment(1);
        tracing::info!(
            investment_id = %settled.id,
            user_id = %user_id,
            payout = %settlement.payout,
            penalty = %settlement.penalty,
            "Investment liquidated"
        );
    }

    Ok((settled, settlement))
}

/// Settle one investment at maturity in its own transaction.
///
/// Returns `Ok(None)` when the row is gone, no longer ACTIVE, or not yet
/// due, which makes repeated sweeps harmless.
pub async fn mature_investment(
    pool: &PgPool,
    investment_id: Uuid,
    now: DateTime<Utc>,
) -> anyhow::Result<Option<(Investment, Settlement)>> {
    let mut tx = pool.begin().await?;

    let Some(investment) = investment_repo::lock_investment(&mut *tx, investment_id).await? else {
        return Ok(None);
    };

    if !investment.is_active() || investment.maturity_date > now {
        return Ok(None);
    }

    let Some(result) = settle_matured(&mut *tx, &investment, None).await? else {
        return Ok(None);
    };

    tx.commit().await?;

    Ok(Some(result))
}

/// Flip a locked ACTIVE row to MATURED and credit principal plus return.
/// `actor` is `None` for the sweep.
async fn settle_matured(
    conn: &mut PgConnection,
    investment: &Investment,
    actor: Option<Uuid>,
) -> anyhow::Result<Option<(Investment, Settlement)>> {
    let settlement = maturity_settlement(investment.amount, investment.expected_return);
    let Some(settled) = investment_repo::settle_investment(
        &mut *conn,
        investment.id,
        investment_status::MATURED,
        settlement.payout,
        settlement.penalty,
    )
    .await?
    else {
        return Ok(None);
    };

    let wallet = wallet_repo::adjust_balance(&mut *conn, settled.wallet_id, settlement.payout).await?;

    transaction_repo::insert_transaction(
        &mut *conn,
        &NewTransaction {
            user_id: settled.user_id,
            wallet_id: wallet.id,
            tx_type: tx_type::INVESTMENT_RETURN,
            direction: direction::CREDIT,
            amount: settlement.payout,
            balance_after: wallet.balance,
            reference: Some(settled.id),
            description: format!("{} investment matured", settled.plan_type),
        },
    )
    .await?;

    audit_repo::insert_audit_log(
        &mut *conn,
        actor,
        audit_action::INVESTMENT_MATURED,
        ENTITY_INVESTMENT,
        Some(settled.id),
        json!({
            "user_id": settled.user_id,
            "payout": settlement.payout,
        }),
    )
    .await?;

    Ok(Some((settled, settlement)))
}

/// Flip a locked ACTIVE row to LIQUIDATED and credit the penalised payout.
async fn settle_liquidated(
    conn: &mut PgConnection,
    investment: &Investment,
) -> anyhow::Result<Option<(Investment, Settlement)>> {
    let settlement = liquidation_settlement(investment.amount, investment.expected_return);
    let Some(settled) = investment_repo::settle_investment(
        &mut *conn,
        investment.id,
        investment_status::LIQUIDATED,
        settlement.payout,
        settlement.penalty,
    )
    .await?
    else {
        return Ok(None);
    };

    let wallet = wallet_repo::adjust_balance(&mut *conn, settled.wallet_id, settlement.payout).await?;

    transaction_repo::insert_transaction(
        &mut *conn,
        &NewTransaction {
            user_id: settled.user_id,
            wallet_id: wallet.id,
            tx_type: tx_type::INVESTMENT_LIQUIDATION,
            direction: direction::CREDIT,
            amount: settlement.payout,
            balance_after: wallet.balance,
            reference: Some(settled.id),
            description: format!(
                "Early liquidation of {} investment (penalty {})",
                settled.plan_type, settlement.penalty
            ),
        },
    )
    .await?;

    audit_repo::insert_audit_log(
        &mut *conn,
        Some(settled.user_id),
        audit_action::INVESTMENT_LIQUIDATED,
        ENTITY_INVESTMENT,
        Some(settled.id),
        json!({
            "payout": settlement.payout,
            "penalty": settlement.penalty,
        }),
    )
    .await?;

    Ok(Some((settled, settlement)))
}

pub async fn list_investments(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<InvestmentView>, AppError> {
    let investments = investment_repo::get_investments_by_user(pool, user_id).await?;
    Ok(investments.into_iter().map(|inv| to_view(inv, now)).collect())
}

pub async fn get_investment(
    pool: &PgPool,
    user_id: Uuid,
    investment_id: Uuid,
    now: DateTime<Utc>,
) -> Result<InvestmentView, AppError> {
    let investment = investment_repo::get_investment_for_user(pool, investment_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("investment not found".into()))?;

    Ok(to_view(investment, now))
}

/// Ledger rows referencing one of the caller's investments, oldest first.
pub async fn investment_transactions(
    pool: &PgPool,
    user_id: Uuid,
    investment_id: Uuid,
) -> Result<Vec<Transaction>, AppError> {
    let investment = investment_repo::get_investment_for_user(pool, investment_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("investment not found".into()))?;

    Ok(transaction_repo::get_transactions_by_reference(pool, investment.id).await?)
}

pub async fn investment_summary(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<InvestmentSummary, AppError> {
    let investments = investment_repo::get_investments_by_user(pool, user_id).await?;
    Ok(summarize(&investments, now))
}
