use axum::Router;

use crate::poller::SharedState;

mod alerts;
mod health;
mod readings;
mod series;

// ---

pub fn router(state: SharedState) -> Router {
    // ---
    Router::new()
        .merge(alerts::router())
        .merge(readings::router())
        .merge(series::router())
        .merge(health::router())
        .with_state(state)
}
