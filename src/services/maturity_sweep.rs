use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};

use crate::api::ws_types::WsMessage;
use crate::db::{investment_repo, settings_repo};
use crate::services::investment_service;

/// Runtime kill-switch for the periodic sweep, stored in system_settings.
pub const SWEEP_ENABLED_KEY: &str = "maturity_sweep_enabled";

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub due: usize,
    pub settled: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Settle every ACTIVE investment whose maturity date is at or before `now`.
///
/// Investments are processed sequentially, each in its own transaction.
/// A failure on one is logged and counted; the others still settle.
pub async fn sweep_once(
    pool: &PgPool,
    now: DateTime<Utc>,
    events: Option<&broadcast::Sender<WsMessage>>,
) -> anyhow::Result<SweepReport> {
    let started = Instant::now();
    let due = investment_repo::get_due_investment_ids(pool, now).await?;

    let mut report = SweepReport {
        due: due.len(),
        ..SweepReport::default()
    };

    for id in due {
        match investment_service::mature_investment(pool, id, now).await {
            Ok(Some((investment, settlement))) => {
                report.settled += 1;
                metrics::counter!("investments_matured_total").increment(1);
                tracing::info!(
                    investment_id = %investment.id,
                    user_id = %investment.user_id,
                    payout = %settlement.payout,
                    "Investment matured"
                );
                if let Some(tx) = events {
                    // No subscribers is not an error.
                    let _ = tx.send(WsMessage::InvestmentMatured(investment));
                }
            }
            Ok(None) => {
                report.skipped += 1;
                tracing::debug!(investment_id = %id, "Investment no longer due, skipping");
            }
            Err(e) => {
                report.failed += 1;
                metrics::counter!("maturity_sweep_failures_total").increment(1);
                tracing::error!(error = %e, investment_id = %id, "Failed to mature investment");
            }
        }
    }

    metrics::histogram!("maturity_sweep_duration_seconds").record(started.elapsed().as_secs_f64());

    Ok(report)
}

/// Run the maturity sweep loop. Every `interval_secs` it settles due
/// investments unless paused via the control API or disabled in settings.
/// `default_enabled` applies while the setting has never been written.
pub async fn run_maturity_sweep(
    pool: PgPool,
    interval_secs: u64,
    default_enabled: bool,
    pause_flag: Arc<AtomicBool>,
    events: broadcast::Sender<WsMessage>,
) {
    tracing::info!(interval_secs = interval_secs, default_enabled, "Maturity sweep started");

    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // Respect pause flag
        if pause_flag.load(Ordering::Relaxed) {
            tracing::debug!("Maturity sweep paused");
            continue;
        }

        match settings_repo::get_bool_setting(&pool, SWEEP_ENABLED_KEY, default_enabled).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Maturity sweep disabled in system settings");
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, "Maturity sweep: failed to read settings");
                continue;
            }
        }

        match sweep_once(&pool, Utc::now(), Some(&events)).await {
            Ok(report) if report.due == 0 => {
                tracing::debug!("Maturity sweep: nothing due");
            }
            Ok(report) => {
                tracing::info!(
                    due = report.due,
                    settled = report.settled,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Maturity sweep pass complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Maturity sweep: failed to fetch due investments");
            }
        }

        if let Ok(active) = investment_repo::count_active_investments(&pool).await {
            metrics::gauge!("active_investments").set(active as f64);
        }
    }
}
