use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::auth::AuthUser;
use crate::db::{transaction_repo, user_repo, wallet_repo};
use crate::errors::AppError;
use crate::models::{Transaction, User, Wallet};
use crate::AppState;

use super::{ApiResponse, LimitQuery};

#[derive(Serialize)]
pub struct Profile {
    pub user: User,
    pub wallet: Option<Wallet>,
}

/// GET /api/me - caller profile and wallet
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let profile = user_repo::get_user_by_id(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    let wallet = wallet_repo::get_wallet_by_user(&state.db, user.user_id).await?;

    Ok(Json(ApiResponse::ok(Profile {
        user: profile,
        wallet,
    })))
}

/// GET /api/wallet - caller's wallet
pub async fn wallet(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Wallet>>, AppError> {
    let wallet = wallet_repo::get_wallet_by_user(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("wallet not found".into()))?;

    Ok(Json(ApiResponse::ok(wallet)))
}

/// GET /api/transactions?limit= - caller's ledger, newest first
pub async fn transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let rows = transaction_repo::get_transactions_by_user(&state.db, user.user_id, q.clamped()).await?;
    Ok(Json(ApiResponse::ok(rows)))
}
