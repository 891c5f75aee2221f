//! Active-alerts endpoint for the dashboard alert panel.
//!
//! Serves whatever is currently inside the display window. Expiry is
//! evaluated against the wall clock at request time, so an entry never
//! outlives its window between poll ticks; the sweep itself only runs on
//! poll cycles.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;

use crate::models::ReadingRow;
use crate::poller::SharedState;

// ---

pub fn router() -> Router<SharedState> {
    // ---
    Router::new().route("/alerts", get(handler))
}

/// Handle `GET /alerts`.
///
/// Returns one table-ready row per visible alert, ordered by sensor id so
/// the panel is stable across refreshes.
async fn handler(State(state): State<SharedState>) -> Json<Vec<ReadingRow>> {
    // ---
    let now = Local::now().naive_local();
    let engine = state.engine.lock().await;

    let mut rows: Vec<ReadingRow> = engine
        .active_at(now)
        .iter()
        .map(|entry| entry.alert.reading.to_row(&state.catalog))
        .collect();
    rows.sort_by_key(|row| (row.sensor_id, row.lectura_id));

    Json(rows)
}
