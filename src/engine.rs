//! Alert detection and the active-display window.
//!
//! One [`AlertEngine`] per process owns the detection watermark and the
//! visible-alert map, so a reading is evaluated exactly once and the HTTP
//! surface can ask for the currently-visible alerts at any time. The sole
//! mutating entry point is [`AlertEngine::process_batch`], invoked once per
//! poll cycle.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::models::{Alert, AlertKind, RangeCatalog, Reading};

// ---

/// One visible slot per sensor and violation kind.
type VisibleKey = (i64, AlertKind);

/// An alert currently in the display window.
#[derive(Debug, Clone)]
pub struct ActiveAlert {
    pub alert: Alert,
    pub expires_at: NaiveDateTime,
}

/// Result of one poll cycle.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Freshly detected violations, in batch order. These are what the
    /// reporter forwards.
    pub new_alerts: Vec<Alert>,
    /// Everything visible after the sweep, in no particular order.
    pub active: Vec<ActiveAlert>,
}

pub struct AlertEngine {
    catalog: RangeCatalog,
    visibility: Duration,
    /// Highest reading id already evaluated. `None` until the first
    /// non-empty batch.
    watermark: Option<i64>,
    window: HashMap<VisibleKey, ActiveAlert>,
}

impl AlertEngine {
    // ---
    pub fn new(catalog: RangeCatalog, visibility: Duration) -> Self {
        Self {
            catalog,
            visibility,
            watermark: None,
            window: HashMap::new(),
        }
    }

    /// Run one poll cycle over the current batch.
    ///
    /// Sorts the batch by timestamp (the upstream may deliver it
    /// unordered), emits the readings past the watermark that violate a
    /// bound, folds the fresh ones into the display window, sweeps expired
    /// entries, and returns both lists.
    ///
    /// An alert detected more than the visibility duration before `now`
    /// (a backfill catch-up) is still emitted in `new_alerts` but never
    /// enters the window.
    pub fn process_batch(&mut self, mut readings: Vec<Reading>, now: NaiveDateTime) -> BatchOutcome {
        // ---
        readings.sort_by(|a, b| {
            a.taken_at
                .cmp(&b.taken_at)
                .then(a.reading_id.cmp(&b.reading_id))
        });

        let new_alerts = self.detect(&readings);

        for alert in &new_alerts {
            if now - alert.detected_at() > self.visibility {
                debug!(
                    "Sensor {} {}: out of display window, not shown",
                    alert.reading.sensor_id,
                    alert.kind.label()
                );
                continue;
            }
            let key = (alert.reading.sensor_id, alert.kind);
            self.window.insert(
                key,
                ActiveAlert {
                    alert: alert.clone(),
                    expires_at: alert.detected_at() + self.visibility,
                },
            );
        }

        self.window.retain(|_, entry| entry.expires_at >= now);

        BatchOutcome {
            new_alerts,
            active: self.window.values().cloned().collect(),
        }
    }

    /// Readings past the watermark that violate a bound.
    ///
    /// The watermark advances to the highest id seen even when nothing
    /// violates, so a reading is never re-examined. An empty batch leaves
    /// it untouched.
    fn detect(&mut self, readings: &[Reading]) -> Vec<Alert> {
        // ---
        let Some(batch_max) = readings.iter().map(|r| r.reading_id).max() else {
            return Vec::new();
        };

        let seen = self.watermark;
        self.watermark = Some(seen.map_or(batch_max, |w| w.max(batch_max)));

        readings
            .iter()
            .filter(|r| seen.map_or(true, |w| r.reading_id > w))
            .filter_map(|r| {
                self.catalog.classify(r).map(|kind| Alert {
                    reading: r.clone(),
                    kind,
                })
            })
            .collect()
    }

    /// Visible entries at `now`, without mutating the window.
    ///
    /// The sweep only runs on poll ticks; this lets HTTP reads between
    /// ticks stay accurate without ever exposing an expired entry.
    pub fn active_at(&self, now: NaiveDateTime) -> Vec<ActiveAlert> {
        self.window
            .values()
            .filter(|entry| entry.expires_at >= now)
            .cloned()
            .collect()
    }
}
