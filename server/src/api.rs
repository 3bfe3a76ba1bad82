use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use common::state::{StateAttribute, StatusFlag, StatusStateAttribute};
use common::{RobotStateStore, StatusValue};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::mock_map::MockMap;
use crate::simulation::SimulationLoop;
use crate::ws;

#[derive(Clone)]
pub struct AppState {
    pub map: Arc<RwLock<MockMap>>,
    pub state: Arc<RwLock<RobotStateStore>>,
    pub simulation: Arc<SimulationLoop>,
    pub broadcast_tx: broadcast::Sender<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/map/layers", get(get_map_layers))
        .route("/api/state", get(get_state))
        .route("/api/state/status", put(put_status))
        .route("/api/robot/step", post(post_step))
        .route("/api/health", get(health))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn get_map(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.map.read().await.get_map();
    Json(snapshot)
}

async fn get_map_layers(State(state): State<AppState>) -> impl IntoResponse {
    let layers = state.map.read().await.get_map_layers();
    Json(layers)
}

async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    let attributes: Vec<StateAttribute> = state.state.read().await.attributes().to_vec();
    Json(attributes)
}

#[derive(Deserialize)]
struct StatusRequest {
    value: StatusValue,
    #[serde(default)]
    flag: StatusFlag,
}

async fn put_status(
    State(state): State<AppState>,
    Json(request): Json<StatusRequest>,
) -> impl IntoResponse {
    let attribute = StatusStateAttribute {
        value: request.value,
        flag: request.flag,
    };
    state
        .state
        .write()
        .await
        .upsert_first_matching_attribute(StateAttribute::Status(attribute));

    tracing::info!("Status set to {:?} ({:?})", attribute.value, attribute.flag);
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct StepRequest {
    distance: f64,
    heading: Option<f64>,
}

impl StepRequest {
    fn is_finite(&self) -> bool {
        self.distance.is_finite() && self.heading.map_or(true, f64::is_finite)
    }
}

async fn post_step(
    State(state): State<AppState>,
    Json(request): Json<StepRequest>,
) -> impl IntoResponse {
    if !request.is_finite() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "distance and heading must be finite" })),
        );
    }

    let (x, y) = state.simulation.step(request.distance, request.heading).await;

    (
        StatusCode::OK,
        Json(serde_json::json!({ "x": x, "y": y })),
    )
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let segments: Vec<u32> = state.map.read().await.assembler().segments().ids().collect();

    Json(serde_json::json!({
        "status": "ok",
        "segments": segments,
        "tick_running": state.simulation.is_running(),
        "listeners": state.simulation.events().listener_count(),
        "ws_clients": state.broadcast_tx.receiver_count()
    }))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws::handle_socket(socket, state))
}
