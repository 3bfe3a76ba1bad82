mod api;
mod assembler;
mod config;
mod error;
mod events;
mod mock_map;
mod robot;
mod simulation;
mod snapshot;
mod ws;

use common::RobotStateStore;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::CorsLayer;

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    let signal_name = tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    };
    tracing::info!("Received {}, stopping mock map server", signal_name);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mockmap_server=info".parse()?),
        )
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Starting mock map server on {}", config.listen_addr);

    let map = Arc::new(RwLock::new(mock_map::MockMap::new(&config.map)));
    let state = Arc::new(RwLock::new(RobotStateStore::docked()));

    let (broadcast_tx, _) = broadcast::channel::<String>(64);

    let events = events::MapEvents::new();
    ws::forward_map_updates(&events, broadcast_tx.clone());

    let simulation = Arc::new(simulation::SimulationLoop::new(
        map.clone(),
        state.clone(),
        events,
    ));
    simulation.start();

    let app_state = api::AppState {
        map,
        state,
        simulation: simulation.clone(),
        broadcast_tx,
    };

    let app = api::router(app_state)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Server listening on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulation.stop();
    tracing::info!("Server stopped.");
    Ok(())
}
