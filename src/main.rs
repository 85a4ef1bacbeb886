use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::broadcast;

use vaultbank::api::router::create_router;
use vaultbank::api::ws_types::WsMessage;
use vaultbank::config::AppConfig;
use vaultbank::services::maturity_sweep::run_maturity_sweep;
use vaultbank::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    let addr = config.bind_addr();

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database connected, migrations applied");

    let metrics_handle = metrics::init_metrics()?;

    // --- Broadcast channel for investment events ---
    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);
    let pause_flag = Arc::new(AtomicBool::new(false));

    // --- Maturity sweep ---
    // Always spawned; MATURITY_SWEEP_ENABLED only seeds the runtime setting.
    {
        let sweep_pool = pool.clone();
        let sweep_events = ws_tx.clone();
        let sweep_pause = Arc::clone(&pause_flag);
        let interval_secs = config.maturity_sweep_interval_secs;
        let default_enabled = config.maturity_sweep_enabled;
        tokio::spawn(async move {
            run_maturity_sweep(sweep_pool, interval_secs, default_enabled, sweep_pause, sweep_events)
                .await;
        });
    }

    let state = AppState {
        db: pool,
        config,
        ws_tx,
        metrics_handle,
        pause_flag,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
