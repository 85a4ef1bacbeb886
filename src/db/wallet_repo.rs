use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Wallet;

/// Open a wallet for a user with an opening balance.
pub async fn create_wallet(
    pool: &PgPool,
    user_id: Uuid,
    balance: Decimal,
    currency: &str,
) -> anyhow::Result<Wallet> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        INSERT INTO wallets (user_id, balance, currency)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(balance)
    .bind(currency)
    .fetch_one(pool)
    .await?;

    Ok(wallet)
}

pub async fn get_wallet_by_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Wallet>> {
    let wallet = sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(wallet)
}

/// Fetch and row-lock a user's wallet. Must run inside a transaction.
pub async fn lock_wallet_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> anyhow::Result<Option<Wallet>> {
    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT * FROM wallets WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(wallet)
}

/// Add `delta` (negative to debit) to a wallet balance and return the updated row.
pub async fn adjust_balance(
    conn: &mut PgConnection,
    wallet_id: Uuid,
    delta: Decimal,
) -> anyhow::Result<Wallet> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        UPDATE wallets
        SET balance = balance + $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(wallet_id)
    .bind(delta)
    .fetch_one(&mut *conn)
    .await?;

    Ok(wallet)
}
