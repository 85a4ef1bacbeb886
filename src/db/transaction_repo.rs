use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Transaction;

/// Fields for a new ledger row.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub tx_type: &'a str,
    pub direction: &'a str,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub reference: Option<Uuid>,
    pub description: String,
}

pub async fn insert_transaction(
    conn: &mut PgConnection,
    tx: &NewTransaction<'_>,
) -> anyhow::Result<Transaction> {
    let row = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions
            (user_id, wallet_id, tx_type, direction, amount, balance_after, reference, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.wallet_id)
    .bind(tx.tx_type)
    .bind(tx.direction)
    .bind(tx.amount)
    .bind(tx.balance_after)
    .bind(tx.reference)
    .bind(&tx.description)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Most recent ledger rows for a user.
pub async fn get_transactions_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All ledger rows pointing at a given entity (e.g. an investment).
pub async fn get_transactions_by_reference(
    pool: &PgPool,
    reference: Uuid,
) -> anyhow::Result<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE reference = $1 ORDER BY created_at ASC",
    )
    .bind(reference)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
