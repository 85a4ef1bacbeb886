use std::collections::{BTreeMap, HashMap};

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::auth::AuthUser;
use crate::db::{audit_repo, settings_repo};
use crate::errors::AppError;
use crate::models::audit::audit_action;
use crate::services::investment_service::INVESTMENTS_ENABLED_KEY;
use crate::services::maturity_sweep::SWEEP_ENABLED_KEY;
use crate::AppState;

use super::ApiResponse;

/// Settings that may be changed at runtime. All are booleans.
const ALLOWED_KEYS: &[&str] = &[INVESTMENTS_ENABLED_KEY, SWEEP_ENABLED_KEY];

fn defaults_from_config(state: &AppState) -> BTreeMap<String, String> {
    let mut m = BTreeMap::new();
    m.insert(INVESTMENTS_ENABLED_KEY.into(), "true".into());
    m.insert(
        SWEEP_ENABLED_KEY.into(),
        state.config.maturity_sweep_enabled.to_string(),
    );
    m
}

/// GET /api/settings - effective system settings (admin)
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    user.require_admin()?;

    let mut merged = defaults_from_config(&state);
    for entry in settings_repo::get_all_settings(&state.db).await? {
        if ALLOWED_KEYS.contains(&entry.key.as_str()) {
            merged.insert(entry.key, entry.value);
        }
    }

    Ok(Json(ApiResponse::ok(merged)))
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub entries: HashMap<String, String>,
}

/// PUT /api/settings - upsert allowed settings (admin)
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;

    // Filter to only allowed keys
    let filtered: HashMap<String, String> = body
        .entries
        .into_iter()
        .filter(|(k, _)| ALLOWED_KEYS.contains(&k.as_str()))
        .collect();

    if filtered.is_empty() {
        return Err(AppError::BadRequest("No valid setting keys provided".into()));
    }

    if let Some((key, value)) = filtered.iter().find(|(_, v)| v.parse::<bool>().is_err()) {
        return Err(AppError::BadRequest(format!(
            "setting {key} must be true or false, got {value:?}"
        )));
    }

    let mut tx = state.db.begin().await?;
    settings_repo::upsert_settings(&mut *tx, &filtered).await?;
    audit_repo::insert_audit_log(
        &mut *tx,
        Some(user.user_id),
        audit_action::SETTINGS_UPDATED,
        "system_setting",
        None,
        json!(filtered),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.user_id, updated = filtered.len(), "System settings updated");

    Ok(Json(json!({
        "success": true,
        "updated": filtered.len()
    })))
}
