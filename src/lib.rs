pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod investments;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::ws_types::WsMessage;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub ws_tx: broadcast::Sender<WsMessage>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    /// Set by the control API to pause the maturity sweep.
    pub pause_flag: Arc<AtomicBool>,
}
