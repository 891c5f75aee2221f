//! Latest-readings endpoint backing the dashboard table.

use axum::{extract::State, routing::get, Json, Router};

use crate::models::ReadingRow;
use crate::poller::SharedState;

// ---

pub fn router() -> Router<SharedState> {
    // ---
    Router::new().route("/readings", get(handler))
}

/// Handle `GET /readings`.
///
/// Returns the snapshot taken by the last poll cycle in table-ready form,
/// time-ordered with the newest reading last. Per-field alert flags mark
/// the cells the table should emphasize.
async fn handler(State(state): State<SharedState>) -> Json<Vec<ReadingRow>> {
    // ---
    let readings = state.latest.read().await;
    let rows = readings
        .iter()
        .map(|r| r.to_row(&state.catalog))
        .collect();
    Json(rows)
}
