//! Fixed-interval poll cycle driving the alert pipeline.
//!
//! Each tick fetches the trailing window of readings, runs them through the
//! engine, forwards new alerts to the sink, and refreshes the snapshot the
//! HTTP surface serves. Every cycle is independent: a failure anywhere in
//! one cycle is logged and never prevents the next tick from running.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDateTime};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::engine::AlertEngine;
use crate::feed::ReadingFeed;
use crate::models::{RangeCatalog, Reading};
use crate::report::AlertReporter;

// ---

/// State shared between the poll task and the HTTP surface.
///
/// The engine holds the watermark and the display window, so it sits behind
/// a mutex; the reading snapshot is read-mostly and gets an RwLock. The
/// reporter's dedup set stays inside the poll task and is never shared.
#[derive(Clone)]
pub struct SharedState {
    pub engine: Arc<Mutex<AlertEngine>>,
    pub latest: Arc<RwLock<Vec<Reading>>>,
    pub catalog: RangeCatalog,
}

impl SharedState {
    // ---
    pub fn new(engine: AlertEngine, catalog: RangeCatalog) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            latest: Arc::new(RwLock::new(Vec::new())),
            catalog,
        }
    }
}

/// Run the poll loop until the process exits.
///
/// The first cycle fires immediately; cycles are serialized, so a slow poll
/// delays the next tick rather than overlapping it.
pub async fn run(
    feed: ReadingFeed,
    mut reporter: AlertReporter,
    state: SharedState,
    interval_secs: u64,
    lookback_hours: i64,
) {
    // ---
    let mut ticker = tokio::time::interval(StdDuration::from_secs(interval_secs));

    loop {
        ticker.tick().await;
        let now = Local::now().naive_local();
        if let Err(e) = run_cycle(&feed, &mut reporter, &state, now, lookback_hours).await {
            error!("Poll cycle failed: {:#}", e);
        }
    }
}

/// One poll cycle: fetch, detect, report, publish.
///
/// Split out from [`run`] so tests can drive cycles with a fixed clock.
pub async fn run_cycle(
    feed: &ReadingFeed,
    reporter: &mut AlertReporter,
    state: &SharedState,
    now: NaiveDateTime,
    lookback_hours: i64,
) -> Result<()> {
    // ---
    let since = now - Duration::hours(lookback_hours);
    let mut readings = feed.fetch_since(since).await?;
    readings.sort_by(|a, b| {
        a.taken_at
            .cmp(&b.taken_at)
            .then(a.reading_id.cmp(&b.reading_id))
    });

    let outcome = {
        let mut engine = state.engine.lock().await;
        engine.process_batch(readings.clone(), now)
    };

    if outcome.new_alerts.is_empty() {
        debug!("Poll cycle: {} readings, no new alerts", readings.len());
    } else {
        info!(
            "Poll cycle: {} readings, {} new alert(s), {} active",
            readings.len(),
            outcome.new_alerts.len(),
            outcome.active.len()
        );
    }

    reporter.report_batch(&outcome.new_alerts, now).await;

    *state.latest.write().await = readings;

    Ok(())
}
