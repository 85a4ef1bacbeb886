use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::investment::investment_status;
use crate::models::Investment;

/// Fields for a new ACTIVE investment.
#[derive(Debug, Clone)]
pub struct NewInvestment<'a> {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub plan_type: &'a str,
    pub amount: Decimal,
    pub roi: Decimal,
    pub expected_return: Decimal,
    pub duration_days: i32,
    pub start_date: DateTime<Utc>,
    pub maturity_date: DateTime<Utc>,
}

pub async fn insert_investment(
    conn: &mut PgConnection,
    inv: &NewInvestment<'_>,
) -> anyhow::Result<Investment> {
    let row = sqlx::query_as::<_, Investment>(
        r#"
        INSERT INTO investments
            (user_id, wallet_id, plan_type, amount, roi, expected_return,
             duration_days, start_date, maturity_date, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(inv.user_id)
    .bind(inv.wallet_id)
    .bind(inv.plan_type)
    .bind(inv.amount)
    .bind(inv.roi)
    .bind(inv.expected_return)
    .bind(inv.duration_days)
    .bind(inv.start_date)
    .bind(inv.maturity_date)
    .bind(investment_status::ACTIVE)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Get an investment only if it belongs to `user_id`.
pub async fn get_investment_for_user(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<Option<Investment>> {
    let row = sqlx::query_as::<_, Investment>(
        "SELECT * FROM investments WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_investment_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Investment>> {
    let row = sqlx::query_as::<_, Investment>("SELECT * FROM investments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Fetch and row-lock an investment. Must run inside a transaction.
pub async fn lock_investment(
    conn: &mut PgConnection,
    id: Uuid,
) -> anyhow::Result<Option<Investment>> {
    let row = sqlx::query_as::<_, Investment>(
        "SELECT * FROM investments WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// All investments of a user, newest first.
pub async fn get_investments_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<Investment>> {
    let rows = sqlx::query_as::<_, Investment>(
        "SELECT * FROM investments WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// IDs of ACTIVE investments whose maturity date is at or before `now`,
/// oldest maturity first.
pub async fn get_due_investment_ids(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM investments
        WHERE status = $1 AND maturity_date <= $2
        ORDER BY maturity_date ASC
        "#,
    )
    .bind(investment_status::ACTIVE)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Flip an ACTIVE investment to a terminal status and record its payout.
/// Returns `None` if the row was no longer ACTIVE.
pub async fn settle_investment(
    conn: &mut PgConnection,
    id: Uuid,
    status: &str,
    payout: Decimal,
    penalty: Decimal,
) -> anyhow::Result<Option<Investment>> {
    let row = sqlx::query_as::<_, Investment>(
        r#"
        UPDATE investments
        SET status = $2, payout = $3, penalty = $4, settled_at = NOW()
        WHERE id = $1 AND status = $5
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(payout)
    .bind(penalty)
    .bind(investment_status::ACTIVE)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn count_active_investments(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM investments WHERE status = $1")
        .bind(investment_status::ACTIVE)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
