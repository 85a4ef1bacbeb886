use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::db::{audit_repo, investment_repo, transaction_repo};
use crate::errors::AppError;
use crate::models::{AuditLog, Investment, Transaction};
use crate::AppState;

use super::{ApiResponse, LimitQuery};

/// GET /api/audit-logs?limit= - most recent audit entries (admin)
pub async fn recent(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLog>>>, AppError> {
    user.require_admin()?;
    let logs = audit_repo::get_recent_audit_logs(&state.db, q.clamped()).await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// Everything recorded against one investment.
#[derive(Serialize)]
pub struct InvestmentTrail {
    pub investment: Investment,
    pub transactions: Vec<Transaction>,
    pub audit_logs: Vec<AuditLog>,
}

/// GET /api/audit-logs/investments/{id} - ledger and audit trail of any investment (admin)
pub async fn investment_trail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvestmentTrail>>, AppError> {
    user.require_admin()?;

    let investment = investment_repo::get_investment_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("investment not found".into()))?;
    let transactions = transaction_repo::get_transactions_by_reference(&state.db, id).await?;
    let audit_logs = audit_repo::get_audit_logs_for_entity(&state.db, id).await?;

    Ok(Json(ApiResponse::ok(InvestmentTrail {
        investment,
        transactions,
        audit_logs,
    })))
}
