mod common;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use vaultbank::db::{audit_repo, investment_repo, transaction_repo};
use vaultbank::errors::AppError;
use vaultbank::models::audit::audit_action;
use vaultbank::models::investment::investment_status;
use vaultbank::models::transaction::{direction, tx_type};
use vaultbank::services::investment_service::{
    create_investment, liquidate_investment, mature_investment, open_investment,
};
use vaultbank::services::maturity_sweep::sweep_once;

#[tokio::test]
async fn test_create_debits_wallet_and_records_ledger() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let inv = create_investment(&pool, user.id, "basic", dec!(2000), Utc::now())
        .await
        .expect("Investment should be created");

    assert_eq!(inv.status, investment_status::ACTIVE);
    assert_eq!(inv.plan_type, "BASIC");
    assert_eq!(inv.expected_return, dec!(100));
    assert_eq!(inv.duration_days, 30);
    assert_eq!(inv.maturity_date - inv.start_date, Duration::days(30));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(3000));

    let ledger = transaction_repo::get_transactions_by_reference(&pool, inv.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].tx_type, tx_type::INVESTMENT);
    assert_eq!(ledger[0].direction, direction::DEBIT);
    assert_eq!(ledger[0].amount, dec!(2000));
    assert_eq!(ledger[0].balance_after, dec!(3000));

    let audit = audit_repo::get_audit_logs_for_entity(&pool, inv.id).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, audit_action::INVESTMENT_CREATED);
    assert_eq!(audit[0].user_id, Some(user.id));
}

#[tokio::test]
async fn test_insufficient_balance_rejected_without_side_effects() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(1500)).await;

    let result = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now()).await;
    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m.contains("insufficient balance")));

    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(1500));
    let investments = investment_repo::get_investments_by_user(&pool, user.id).await.unwrap();
    assert!(investments.is_empty());
}

#[tokio::test]
async fn test_amount_outside_plan_bounds_rejected() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(100000)).await;

    let below = create_investment(&pool, user.id, "BASIC", dec!(999.99), Utc::now()).await;
    assert!(matches!(below, Err(AppError::BadRequest(_))));

    let above = create_investment(&pool, user.id, "BASIC", dec!(10000), Utc::now()).await;
    assert!(matches!(above, Err(AppError::BadRequest(_))));

    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(100000));
}

#[tokio::test]
async fn test_sub_cent_amount_rejected_without_side_effects() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let result = create_investment(&pool, user.id, "BASIC", dec!(1000.005), Utc::now()).await;
    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m.contains("more than 2 decimal places")));

    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(5000));
    let investments = investment_repo::get_investments_by_user(&pool, user.id).await.unwrap();
    assert!(investments.is_empty());
}

#[tokio::test]
async fn test_cent_amount_round_trips_through_maturity() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let inv = create_investment(&pool, user.id, "BASIC", dec!(1000.01), Utc::now()).await.unwrap();
    assert_eq!(inv.amount, dec!(1000.01));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(3999.99));

    let later = Utc::now() + Duration::days(31);
    let (matured, _) = mature_investment(&pool, inv.id, later).await.unwrap().unwrap();
    assert_eq!(matured.payout, Some(dec!(1000.01) + inv.expected_return));
    assert_eq!(
        common::wallet_balance(&pool, user.id).await,
        dec!(5000) + inv.expected_return
    );
}

#[tokio::test]
async fn test_disabled_investments_rejected_without_side_effects() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let result = open_investment(&pool, false, user.id, "BASIC", dec!(2000), Utc::now()).await;
    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m == "investments are currently disabled"));

    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(5000));
    let investments = investment_repo::get_investments_by_user(&pool, user.id).await.unwrap();
    assert!(investments.is_empty());

    let inv = open_investment(&pool, true, user.id, "BASIC", dec!(2000), Utc::now()).await.unwrap();
    assert_eq!(inv.status, investment_status::ACTIVE);
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(3000));
}

#[tokio::test]
async fn test_vip_accepts_large_amounts() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(50000000)).await;

    let inv = create_investment(&pool, user.id, "VIP", dec!(25000000), Utc::now())
        .await
        .expect("VIP has no ceiling");
    assert_eq!(inv.expected_return, dec!(4500000));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(25000000));
}

#[tokio::test]
async fn test_invalid_plan_rejected() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let result = create_investment(&pool, user.id, "PLATINUM", dec!(2000), Utc::now()).await;
    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m.contains("invalid plan")));
}

#[tokio::test]
async fn test_missing_wallet_is_not_found() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user_without_wallet(&pool).await;

    let result = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_liquidation_pays_principal_plus_return_minus_penalty() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(2000)).await;

    let start = Utc::now() - Duration::days(15);
    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), start).await.unwrap();
    assert_eq!(common::wallet_balance(&pool, user.id).await, Decimal::ZERO);

    let (settled, settlement) = liquidate_investment(&pool, user.id, inv.id, Utc::now()).await.unwrap();
    assert_eq!(settled.status, investment_status::LIQUIDATED);
    assert_eq!(settlement.penalty, dec!(10));
    assert_eq!(settlement.payout, dec!(2090));
    assert_eq!(settled.payout, Some(dec!(2090)));
    assert_eq!(settled.penalty, Some(dec!(10)));
    assert!(settled.settled_at.is_some());
    assert_eq!(settled.expected_return, dec!(100));

    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(2090));

    let ledger = transaction_repo::get_transactions_by_reference(&pool, inv.id).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1].tx_type, tx_type::INVESTMENT_LIQUIDATION);
    assert_eq!(ledger[1].direction, direction::CREDIT);
    assert_eq!(ledger[1].amount, dec!(2090));
}

#[tokio::test]
async fn test_liquidating_past_maturity_settles_as_matured() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(2000)).await;

    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now()).await.unwrap();

    // Not yet due for the real sweep, but due as of `later`.
    let later = Utc::now() + Duration::days(31);
    let (settled, settlement) = liquidate_investment(&pool, user.id, inv.id, later).await.unwrap();
    assert_eq!(settled.status, investment_status::MATURED);
    assert_eq!(settlement.penalty, Decimal::ZERO);
    assert_eq!(settlement.payout, dec!(2100));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(2100));

    let ledger = transaction_repo::get_transactions_by_reference(&pool, inv.id).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1].tx_type, tx_type::INVESTMENT_RETURN);

    let audit = audit_repo::get_audit_logs_for_entity(&pool, inv.id).await.unwrap();
    assert_eq!(audit.last().unwrap().action, audit_action::INVESTMENT_MATURED);
    assert_eq!(audit.last().unwrap().user_id, Some(user.id));
}

#[tokio::test]
async fn test_liquidating_twice_is_rejected() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(3000)).await;

    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now()).await.unwrap();
    liquidate_investment(&pool, user.id, inv.id, Utc::now()).await.unwrap();

    let second = liquidate_investment(&pool, user.id, inv.id, Utc::now()).await;
    assert!(matches!(second, Err(AppError::BadRequest(ref m)) if m.contains("LIQUIDATED")));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(3090));
}

#[tokio::test]
async fn test_liquidating_someone_elses_investment_is_not_found() {
    let pool = common::setup_test_db().await;
    let (owner, _) = common::seed_user(&pool, "USER", dec!(5000)).await;
    let (intruder, _) = common::seed_user(&pool, "USER", dec!(5000)).await;

    let inv = create_investment(&pool, owner.id, "BASIC", dec!(2000), Utc::now()).await.unwrap();

    let result = liquidate_investment(&pool, intruder.id, inv.id, Utc::now()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let still = investment_repo::get_investment_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(still.status, investment_status::ACTIVE);
}

#[tokio::test]
async fn test_sweep_matures_due_investment_once() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(2000)).await;

    let start = Utc::now() - Duration::days(31);
    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), start).await.unwrap();

    // Another test's sweep may settle it first; the end state is the same.
    sweep_once(&pool, Utc::now(), None).await.unwrap();

    let matured = investment_repo::get_investment_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(matured.status, investment_status::MATURED);
    assert_eq!(matured.payout, Some(dec!(2100)));
    assert_eq!(matured.expected_return, dec!(100));
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(2100));

    let ledger = transaction_repo::get_transactions_by_reference(&pool, inv.id).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1].tx_type, tx_type::INVESTMENT_RETURN);

    // Second pass is a no-op for this investment.
    sweep_once(&pool, Utc::now(), None).await.unwrap();

    let after = investment_repo::get_investment_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(after.status, investment_status::MATURED);
    assert_eq!(after.settled_at, matured.settled_at);
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(2100));
    let ledger = transaction_repo::get_transactions_by_reference(&pool, inv.id).await.unwrap();
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn test_sweep_leaves_undue_investments_alone() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(2000)).await;

    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now() - Duration::days(10))
        .await
        .unwrap();

    sweep_once(&pool, Utc::now(), None).await.unwrap();

    let still = investment_repo::get_investment_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(still.status, investment_status::ACTIVE);
    assert!(still.payout.is_none());
    assert_eq!(common::wallet_balance(&pool, user.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_mature_skips_liquidated_investment() {
    let pool = common::setup_test_db().await;
    let (user, _wallet) = common::seed_user(&pool, "USER", dec!(2000)).await;

    let inv = create_investment(&pool, user.id, "BASIC", dec!(2000), Utc::now()).await.unwrap();
    liquidate_investment(&pool, user.id, inv.id, Utc::now()).await.unwrap();

    // Well past maturity, but no longer ACTIVE.
    let later = Utc::now() + Duration::days(60);
    let result = mature_investment(&pool, inv.id, later).await.unwrap();
    assert!(result.is_none());
    assert_eq!(common::wallet_balance(&pool, user.id).await, dec!(2090));
}
