use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::ws_types::WsMessage;
use crate::errors::AppError;
use crate::investments::{catalog, InvestmentSummary, Plan, Settlement};
use crate::models::investment::investment_status;
use crate::models::{InvestmentView, Transaction};
use crate::services::investment_service;
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub amount: Decimal,
    pub plan_type: String,
}

#[derive(Serialize)]
pub struct LiquidationResponse {
    pub investment: InvestmentView,
    pub settlement: Settlement,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/investments/plans - static plan catalog
pub async fn plans() -> Json<ApiResponse<Vec<Plan>>> {
    Json(ApiResponse::ok(catalog()))
}

/// POST /api/investments/create - buy into a plan
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateInvestmentRequest>,
) -> Result<Json<ApiResponse<InvestmentView>>, AppError> {
    let now = Utc::now();
    let investment = investment_service::create_investment(
        &state.db,
        user.user_id,
        &body.plan_type,
        body.amount,
        now,
    )
    .await?;

    let _ = state.ws_tx.send(WsMessage::InvestmentCreated(investment.clone()));

    Ok(Json(ApiResponse::ok(investment_service::to_view(investment, now))))
}

/// GET /api/investments/list - caller's investments, newest first
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<InvestmentView>>>, AppError> {
    let investments = investment_service::list_investments(&state.db, user.user_id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(investments)))
}

/// GET /api/investments/summary - portfolio roll-up
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<InvestmentSummary>>, AppError> {
    let summary = investment_service::investment_summary(&state.db, user.user_id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/investments/{id}
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvestmentView>>, AppError> {
    let investment = investment_service::get_investment(&state.db, user.user_id, id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(investment)))
}

/// POST /api/investments/{id}/liquidate - early exit with penalty
pub async fn liquidate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LiquidationResponse>>, AppError> {
    let now = Utc::now();
    let (investment, settlement) =
        investment_service::liquidate_investment(&state.db, user.user_id, id, now).await?;

    let event = if investment.status == investment_status::MATURED {
        WsMessage::InvestmentMatured(investment.clone())
    } else {
        WsMessage::InvestmentLiquidated(investment.clone())
    };
    let _ = state.ws_tx.send(event);

    Ok(Json(ApiResponse::ok(LiquidationResponse {
        investment: investment_service::to_view(investment, now),
        settlement,
    })))
}

/// GET /api/investments/{id}/transactions - ledger rows for one investment
pub async fn transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let rows = investment_service::investment_transactions(&state.db, user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(rows)))
}
