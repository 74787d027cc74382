use crate::engine::Engine;
use crate::store::memory::MemoryStore;
use crate::store::snapshot;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Shared handle the admin handlers operate on. The mutex serializes
/// operator actions; the ledger assumes a single logical caller at a time.
#[derive(Clone)]
pub struct AdminState {
    pub engine: Arc<Mutex<Engine<MemoryStore>>>,
    pub data_file: PathBuf,
}

pub async fn serve(state: AdminState, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Admin server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AdminState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/summary", get(summary))
        .route("/execute", post(execute))
        .route("/payout", post(payout))
        .route("/revalue", post(revalue))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn summary(State(state): State<AdminState>) -> Json<serde_json::Value> {
    let engine = state.engine.lock().unwrap();
    Json(json!({"status": "OK", "summary": engine.summary()}))
}

#[derive(Deserialize)]
struct ExecuteRequest {
    request_id: Uuid,
    nav: f64,
}

async fn execute(
    State(state): State<AdminState>,
    Json(payload): Json<ExecuteRequest>,
) -> Json<serde_json::Value> {
    let mut engine = state.engine.lock().unwrap();
    match engine.execute_allocation(payload.request_id, payload.nav) {
        Ok(receipt) => {
            persist(&state, &engine);
            Json(json!({"status": "OK", "receipt": receipt}))
        }
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}

#[derive(Deserialize)]
struct PayoutRequest {
    percentage: f64,
    notes: Option<String>,
}

async fn payout(
    State(state): State<AdminState>,
    Json(payload): Json<PayoutRequest>,
) -> Json<serde_json::Value> {
    let mut engine = state.engine.lock().unwrap();
    match engine.run_payout_batch(payload.percentage, payload.notes) {
        Ok(report) => {
            persist(&state, &engine);
            Json(json!({"status": "OK", "report": report}))
        }
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}

#[derive(Deserialize)]
struct RevalueRequest {
    allocation_id: Uuid,
    current_value: f64,
}

async fn revalue(
    State(state): State<AdminState>,
    Json(payload): Json<RevalueRequest>,
) -> Json<serde_json::Value> {
    let mut engine = state.engine.lock().unwrap();
    match engine.apply_valuation(payload.allocation_id, payload.current_value) {
        Ok(()) => {
            persist(&state, &engine);
            Json(json!({"status": "OK"}))
        }
        Err(e) => Json(json!({"status": "ERROR", "msg": e.to_string()})),
    }
}

/// Snapshots after a mutating call. In-memory state stays authoritative for
/// the process lifetime; a failed save is logged and the call still counts.
fn persist(state: &AdminState, engine: &Engine<MemoryStore>) {
    if let Err(e) = snapshot::save_snapshot(&state.data_file, engine.store()) {
        warn!(
            "Failed to save snapshot to {}: {}",
            state.data_file.display(),
            e
        );
    }
}
