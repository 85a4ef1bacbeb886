use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use crate::db::investment_repo;
use crate::AppState;

/// GET /metrics - Prometheus scrape payload.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    // Refresh the gauge so scrapes between sweep passes stay current.
    if let Ok(active) = investment_repo::count_active_investments(&state.db).await {
        metrics::gauge!("active_investments").set(active as f64);
    }

    let body = state.metrics_handle.render();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
