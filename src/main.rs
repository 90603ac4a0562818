use kaiwhakarite_api::{
    app,
    config::{init_tracing, load_config},
    db, events, AppState, Services,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.log_level, config.log_json);

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Kaiwhakarite Rawa API"
    );

    let db_pool = Arc::new(db::establish_connection_from_app_config(&config).await?);

    if config.auto_migrate {
        db::run_migrations(&db_pool).await?;
    }

    let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);
    tokio::spawn(events::process_events(event_rx));
    let event_sender = events::EventSender::new(event_tx);

    let config = Arc::new(config);
    let services = Services::build(db_pool.clone(), event_sender, &config);

    let state = Arc::new(AppState {
        db: db_pool,
        config: config.clone(),
        services,
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
