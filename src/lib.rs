//! Core library for the `sensorwatch` monitoring service.
//!
//! The service polls an upstream sensor-reading API on a fixed interval,
//! classifies previously-unseen readings against static per-metric range
//! bounds, forwards one deduplicated report per new alert to an external
//! sink, and serves the currently-active alerts (plus the latest reading
//! snapshot and plot-ready series) as JSON for a dashboard front end.
//!
//! Module boundaries follow the Explicit Module Boundary Pattern (EMBP):
//! each module exposes a small gateway surface, and this file is the single
//! place the binary, the routes, and the integration tests import from.

pub mod config;
pub mod engine;
pub mod feed;
pub mod models;
pub mod poller;
pub mod report;
pub mod routes;

pub use config::Config;
pub use engine::{ActiveAlert, AlertEngine, BatchOutcome};
pub use models::{Alert, AlertKind, RangeBound, RangeCatalog, RawReading, Reading, ReadingRow};
pub use poller::SharedState;
pub use report::AlertReporter;
