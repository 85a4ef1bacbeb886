use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes - no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes - require a valid Bearer JWT
    let protected = Router::new()
        // Profile, wallet & ledger
        .route("/api/me", get(handlers::wallet::me))
        .route("/api/wallet", get(handlers::wallet::wallet))
        .route("/api/transactions", get(handlers::wallet::transactions))
        // Investments
        .route("/api/investments/plans", get(handlers::investments::plans))
        .route("/api/investments/create", post(handlers::investments::create))
        .route("/api/investments/list", get(handlers::investments::list))
        .route("/api/investments/summary", get(handlers::investments::summary))
        .route("/api/investments/:id", get(handlers::investments::detail))
        .route("/api/investments/:id/liquidate", post(handlers::investments::liquidate))
        .route("/api/investments/:id/transactions", get(handlers::investments::transactions))
        // Admin
        .route("/api/settings", get(handlers::settings::get_settings).put(handlers::settings::update_settings))
        .route("/api/audit-logs", get(handlers::audit::recent))
        .route("/api/audit-logs/investments/:id", get(handlers::audit::investment_trail))
        .route("/api/control/status", get(handlers::control::status))
        .route("/api/control/sweep/pause", post(handlers::control::pause))
        .route("/api/control/sweep/resume", post(handlers::control::resume))
        .route("/api/control/sweep/run", post(handlers::control::run_sweep))
        // WebSocket
        .route("/ws", get(handlers::ws::handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
