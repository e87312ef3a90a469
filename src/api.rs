use crate::config::Config;
use crate::state::FilterState;
use crate::sync::areas::{self, AreaProvider};
use axum::{
    extract::{Json as AxumJson, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

struct ApiState {
    filter: FilterState,
    config: Config,
    sync_sender: Sender<()>,
    area_providers: Vec<Box<dyn AreaProvider>>,
}

pub async fn start_api_server(
    filter: FilterState,
    config: Config,
    sync_sender: Sender<()>,
    port: u16,
) {
    let area_providers = areas::default_chain(config.areas.url.clone());
    let state = Arc::new(ApiState {
        filter,
        config,
        sync_sender,
        area_providers,
    });

    let app = Router::new()
        .route("/api/status", get(get_status))
        .route("/api/rules", get(get_rules))
        .route("/api/areas", get(get_areas))
        .route("/api/sync", post(trigger_sync))
        .route("/api/check", post(check_text))
        .route("/api/pause", post(pause_filtering))
        .route("/api/resume", post(resume_filtering))
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn get_status(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "filtering_active": state.filter.is_filtering_active(),
        "pause_remaining_secs": state.filter.get_pause_remaining_secs(),
        "overwrite_existing": state.config.overwrite_existing,
        "rules_url": state.config.rules_url,
    }))
}

async fn get_rules(State(state): State<Arc<ApiState>>) -> Json<crate::rules::RuleSet> {
    Json(state.filter.rules_snapshot())
}

async fn get_areas(State(state): State<Arc<ApiState>>) -> Json<Vec<areas::Area>> {
    Json(areas::load_area_list(&state.area_providers).await)
}

async fn trigger_sync(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    let _ = state.sync_sender.send(()).await;
    Json(serde_json::json!({ "status": "sync_triggered" }))
}

#[derive(serde::Deserialize)]
struct CheckRequest {
    field: String,
    text: String,
}

async fn check_text(
    State(state): State<Arc<ApiState>>,
    AxumJson(payload): AxumJson<CheckRequest>,
) -> Json<serde_json::Value> {
    let matched = state.filter.check_field(&payload.field, &payload.text);
    Json(serde_json::json!({ "matched": matched }))
}

#[derive(serde::Deserialize)]
struct PauseRequest {
    duration_minutes: u64,
}

async fn pause_filtering(
    State(state): State<Arc<ApiState>>,
    AxumJson(payload): AxumJson<PauseRequest>,
) -> Json<serde_json::Value> {
    let duration = std::time::Duration::from_secs(payload.duration_minutes * 60);
    state.filter.pause_filtering(duration);
    Json(serde_json::json!({ "status": "paused", "duration_min": payload.duration_minutes }))
}

async fn resume_filtering(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    state.filter.resume_filtering();
    Json(serde_json::json!({ "status": "resumed" }))
}
