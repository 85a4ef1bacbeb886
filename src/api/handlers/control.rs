use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::api::auth::AuthUser;
use crate::db::{investment_repo, settings_repo};
use crate::errors::AppError;
use crate::services::maturity_sweep::{self, SweepReport, SWEEP_ENABLED_KEY};
use crate::AppState;

use super::ApiResponse;

/// POST /api/control/sweep/pause - Pause the periodic maturity sweep.
pub async fn pause(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    state.pause_flag.store(true, Ordering::Relaxed);
    tracing::warn!(user_id = %user.user_id, "Maturity sweep PAUSED via control API");
    Ok(Json(json!({ "status": "paused" })))
}

/// POST /api/control/sweep/resume - Resume the periodic maturity sweep.
pub async fn resume(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    state.pause_flag.store(false, Ordering::Relaxed);
    tracing::info!(user_id = %user.user_id, "Maturity sweep RESUMED via control API");
    Ok(Json(json!({ "status": "running" })))
}

/// GET /api/control/status - Sweep status. `sweep_enabled` is the value
/// the loop gates on: the system setting, defaulting to config.
pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let paused = state.pause_flag.load(Ordering::Relaxed);
    let sweep_enabled = settings_repo::get_bool_setting(
        &state.db,
        SWEEP_ENABLED_KEY,
        state.config.maturity_sweep_enabled,
    )
    .await?;
    let active = investment_repo::count_active_investments(&state.db).await?;

    Ok(Json(json!({
        "paused": paused,
        "sweep_enabled": sweep_enabled,
        "sweep_interval_secs": state.config.maturity_sweep_interval_secs,
        "active_investments": active,
    })))
}

/// POST /api/control/sweep/run - Run one sweep pass now, ignoring the pause flag.
pub async fn run_sweep(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<SweepReport>>, AppError> {
    user.require_admin()?;
    let report = maturity_sweep::sweep_once(&state.db, Utc::now(), Some(&state.ws_tx)).await?;
    tracing::info!(
        user_id = %user.user_id,
        settled = report.settled,
        failed = report.failed,
        "Manual maturity sweep complete"
    );
    Ok(Json(ApiResponse::ok(report)))
}
