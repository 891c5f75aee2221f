//! Outbound alert reporting with per-session deduplication.
//!
//! Each new alert is forwarded to the alert sink at most once per
//! (reading id, alert code) pair for the lifetime of the process. A failed
//! forward leaves the pair unmarked so a later re-detection could still
//! report it; there is no retry queue. Reading ids are monotonic and the
//! set is session-scoped, so it is never pruned.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Alert, WIRE_TIME_FORMAT};

// ---

/// Payload accepted by the alert sink.
#[derive(Debug, Serialize)]
pub struct AlertReport {
    pub lectura_id: i64,
    pub tipo_alerta_id: u8,
    pub fecha_generada: String,
}

pub struct AlertReporter {
    client: reqwest::Client,
    sink_url: String,
    reported: HashSet<(i64, u8)>,
}

impl AlertReporter {
    // ---
    pub fn new(sink_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            sink_url,
            reported: HashSet::new(),
        }
    }

    /// Forward each not-yet-reported alert, in order.
    ///
    /// A sink failure on one alert never blocks the rest of the batch.
    pub async fn report_batch(&mut self, alerts: &[Alert], now: NaiveDateTime) {
        // ---
        for alert in alerts {
            self.report(alert, now).await;
        }
    }

    async fn report(&mut self, alert: &Alert, now: NaiveDateTime) {
        // ---
        let key = (alert.reading.reading_id, alert.kind.wire_code());
        if self.reported.contains(&key) {
            debug!("Alert ({}, {}) already reported, skipping", key.0, key.1);
            return;
        }

        let payload = AlertReport {
            lectura_id: key.0,
            tipo_alerta_id: key.1,
            fecha_generada: now.format(WIRE_TIME_FORMAT).to_string(),
        };
        let url = format!("{}/alertas", self.sink_url.trim_end_matches('/'));

        match self.client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                // Marked only after the sink accepted it.
                self.reported.insert(key);
                debug!(
                    "Reported {} for sensor {} (reading {})",
                    alert.kind.label(),
                    alert.reading.sensor_id,
                    key.0
                );
            }
            Ok(resp) => {
                warn!(
                    "Alert sink returned HTTP {} for reading {}, will not retry",
                    resp.status(),
                    key.0
                );
            }
            Err(e) => {
                warn!("Failed to report alert for reading {}: {}", key.0, e);
            }
        }
    }

    /// Number of alerts the sink has accepted this session.
    pub fn reported_count(&self) -> usize {
        self.reported.len()
    }
}
