//! Reading feed adapter for the upstream sensor API.
//!
//! The service does not own the readings; it asks the upstream API for the
//! trailing window each cycle and works with whatever comes back. Rows that
//! fail to parse are logged and dropped here so the engine only ever sees
//! validated readings.

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::models::{RawReading, Reading, WIRE_TIME_FORMAT};

// ---

pub struct ReadingFeed {
    client: reqwest::Client,
    base_url: String,
}

impl ReadingFeed {
    // ---
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch every reading taken at or after `since`.
    ///
    /// Calls `GET {base}/lecturas/desde/{timestamp}` and expects a JSON
    /// array of raw readings. Items that fail to deserialize or carry an
    /// unparsable timestamp are skipped with a debug log; transport errors
    /// propagate to the caller.
    pub async fn fetch_since(&self, since: NaiveDateTime) -> Result<Vec<Reading>> {
        // ---
        let url = format!(
            "{}/lecturas/desde/{}",
            self.base_url.trim_end_matches('/'),
            since.format(WIRE_TIME_FORMAT)
        );

        debug!("Fetching readings from: {}", url);

        let response: serde_json::Value = self.client.get(&url).send().await?.json().await?;

        let Some(items) = response.as_array() else {
            debug!("Response is not an array: {}", response);
            return Ok(Vec::new());
        };

        let mut readings = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match serde_json::from_value::<RawReading>(item.clone()) {
                Ok(raw) => match raw.to_reading() {
                    Ok(reading) => readings.push(reading),
                    Err(e) => {
                        debug!(
                            "Skipping reading {} with bad timestamp '{}': {}",
                            raw.lectura_id, raw.fecha_hora, e
                        );
                    }
                },
                Err(e) => {
                    debug!("Failed to parse item {}: {} - Raw item: {}", i, e, item);
                }
            }
        }

        info!(
            "Fetched {} readings since {} ({} skipped)",
            readings.len(),
            since.format(WIRE_TIME_FORMAT),
            items.len() - readings.len()
        );
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_upstream(body: serde_json::Value) -> String {
        // ---
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new().route(
            "/lecturas/desde/{since}",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_rows() {
        // ---
        let body = json!([
            {
                "sensor_id": 1,
                "lectura_id": 10,
                "fecha_hora": "2025-03-26 18:45:00",
                "temperatura": 25.0,
                "presion": 1020.0,
                "humedad": 50.0
            },
            { "garbage": true },
            {
                "sensor_id": 1,
                "lectura_id": 11,
                "fecha_hora": "not-a-timestamp",
                "temperatura": 25.0,
                "presion": 1020.0,
                "humedad": 50.0
            }
        ]);

        let base = spawn_upstream(body).await;
        let feed = ReadingFeed::new(base);

        let since = NaiveDateTime::parse_from_str("2025-03-26 10:45:00", WIRE_TIME_FORMAT).unwrap();
        let readings = feed.fetch_since(since).await.unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].reading_id, 10);
        assert_eq!(readings[0].temperature, 25.0);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_upstream_is_an_error() {
        // ---
        let feed = ReadingFeed::new("http://127.0.0.1:1".to_string());
        let since = NaiveDateTime::parse_from_str("2025-03-26 10:45:00", WIRE_TIME_FORMAT).unwrap();
        assert!(feed.fetch_since(since).await.is_err());
    }
}
