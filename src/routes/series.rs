//! Plot-ready series endpoint for the dashboard charts.
//!
//! One series per metric over the latest snapshot. The catalog bounds come
//! along as suggested y-axis limits so the charts can show the normal band
//! without knowing the configuration.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::models::{Reading, WIRE_TIME_FORMAT};
use crate::poller::SharedState;

// ---

/// One plottable series for a metric chart.
#[derive(Debug, Serialize)]
pub struct MetricSeries {
    pub metric: &'static str,
    pub label: &'static str,
    pub points: Vec<SeriesPoint>,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Serialize)]
pub struct SeriesPoint {
    pub t: String,
    pub v: f64,
}

pub fn router() -> Router<SharedState> {
    // ---
    Router::new().route("/series", get(handler))
}

/// Handle `GET /series`.
async fn handler(State(state): State<SharedState>) -> Json<Vec<MetricSeries>> {
    // ---
    let readings = state.latest.read().await;
    let catalog = &state.catalog;

    let series = vec![
        build_series(&readings, "temperatura", "Temperatura (°C)", catalog.temperature.min, catalog.temperature.max, |r| r.temperature),
        build_series(&readings, "presion", "Presión", catalog.pressure.min, catalog.pressure.max, |r| r.pressure),
        build_series(&readings, "humedad", "Humedad (%)", catalog.humidity.min, catalog.humidity.max, |r| r.humidity),
    ];

    Json(series)
}

fn build_series(
    readings: &[Reading],
    metric: &'static str,
    label: &'static str,
    y_min: f64,
    y_max: f64,
    value: impl Fn(&Reading) -> f64,
) -> MetricSeries {
    // ---
    MetricSeries {
        metric,
        label,
        points: readings
            .iter()
            .map(|r| SeriesPoint {
                t: r.taken_at.format(WIRE_TIME_FORMAT).to_string(),
                v: value(r),
            })
            .collect(),
        y_min,
        y_max,
    }
}
