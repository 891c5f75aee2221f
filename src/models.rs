//! Data model and range classification for the sensor monitor.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---

/// Timestamp format shared by the readings API and the alert sink.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw sensor reading as delivered by the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    // ---
    pub sensor_id: i64,
    pub lectura_id: i64,
    /// "YYYY-MM-DD HH:mm:ss", second resolution, no zone on the wire.
    pub fecha_hora: String,
    pub temperatura: f64,
    pub presion: f64,
    pub humedad: f64,
}

/// Validated reading with the timestamp parsed. Immutable once built.
#[derive(Debug, Clone)]
pub struct Reading {
    // ---
    pub sensor_id: i64,
    pub reading_id: i64,
    pub taken_at: NaiveDateTime,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}

impl RawReading {
    // ---
    /// Parse the wire timestamp and produce the domain form.
    ///
    /// The only way a raw reading can be rejected; everything else is
    /// taken as-is from the upstream API.
    pub fn to_reading(&self) -> Result<Reading, chrono::ParseError> {
        // ---
        let taken_at = NaiveDateTime::parse_from_str(&self.fecha_hora, WIRE_TIME_FORMAT)?;

        Ok(Reading {
            sensor_id: self.sensor_id,
            reading_id: self.lectura_id,
            taken_at,
            temperature: self.temperatura,
            pressure: self.presion,
            humidity: self.humedad,
        })
    }
}

// ---

/// Inclusive min/max defining normal operation for one metric.
#[derive(Debug, Clone, Copy)]
pub struct RangeBound {
    pub min: f64,
    pub max: f64,
}

impl RangeBound {
    // ---
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The three static per-metric bounds.
#[derive(Debug, Clone, Copy)]
pub struct RangeCatalog {
    pub temperature: RangeBound,
    pub pressure: RangeBound,
    pub humidity: RangeBound,
}

impl Default for RangeCatalog {
    fn default() -> Self {
        Self {
            temperature: RangeBound { min: 20.00, max: 29.99 },
            pressure: RangeBound { min: 1000.0, max: 1049.9 },
            humidity: RangeBound { min: 30.0, max: 99.9 },
        }
    }
}

/// Which bound a reading violated. Wire codes are fixed by the alert sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    LowTemperature,
    HighTemperature,
    LowPressure,
    HighPressure,
    LowHumidity,
    HighHumidity,
}

impl AlertKind {
    // ---
    /// Numeric `tipo_alerta_id` understood by the alert sink.
    pub fn wire_code(self) -> u8 {
        match self {
            AlertKind::LowTemperature => 1,
            AlertKind::HighTemperature => 2,
            AlertKind::LowPressure => 3,
            AlertKind::HighPressure => 4,
            AlertKind::LowHumidity => 5,
            AlertKind::HighHumidity => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertKind::LowTemperature => "temperature below range",
            AlertKind::HighTemperature => "temperature above range",
            AlertKind::LowPressure => "pressure below range",
            AlertKind::HighPressure => "pressure above range",
            AlertKind::LowHumidity => "humidity below range",
            AlertKind::HighHumidity => "humidity above range",
        }
    }
}

impl RangeCatalog {
    // ---
    /// Classify a reading against the catalog.
    ///
    /// Evaluation order is fixed: temperature low, temperature high,
    /// pressure low, pressure high, humidity low, humidity high. The first
    /// violated bound wins even when several metrics are out of range.
    pub fn classify(&self, r: &Reading) -> Option<AlertKind> {
        // ---
        if r.temperature < self.temperature.min {
            Some(AlertKind::LowTemperature)
        } else if r.temperature > self.temperature.max {
            Some(AlertKind::HighTemperature)
        } else if r.pressure < self.pressure.min {
            Some(AlertKind::LowPressure)
        } else if r.pressure > self.pressure.max {
            Some(AlertKind::HighPressure)
        } else if r.humidity < self.humidity.min {
            Some(AlertKind::LowHumidity)
        } else if r.humidity > self.humidity.max {
            Some(AlertKind::HighHumidity)
        } else {
            None
        }
    }
}

/// A reading found in violation, tagged with the first-matching kind.
#[derive(Debug, Clone)]
pub struct Alert {
    pub reading: Reading,
    pub kind: AlertKind,
}

impl Alert {
    // ---
    pub fn detected_at(&self) -> NaiveDateTime {
        self.reading.taken_at
    }
}

// ---

/// Table-ready reading row for the dashboard API, with per-field
/// out-of-range flags for visual emphasis.
#[derive(Debug, Serialize)]
pub struct ReadingRow {
    // ---
    pub sensor_id: i64,
    pub lectura_id: i64,
    pub fecha_hora: String,
    pub temperatura: f64,
    pub presion: f64,
    pub humedad: f64,
    pub temperatura_alert: bool,
    pub presion_alert: bool,
    pub humedad_alert: bool,
}

impl Reading {
    // ---
    pub fn to_row(&self, catalog: &RangeCatalog) -> ReadingRow {
        // ---
        ReadingRow {
            sensor_id: self.sensor_id,
            lectura_id: self.reading_id,
            fecha_hora: self.taken_at.format(WIRE_TIME_FORMAT).to_string(),
            temperatura: self.temperature,
            presion: self.pressure,
            humedad: self.humidity,
            temperatura_alert: !catalog.temperature.contains(self.temperature),
            presion_alert: !catalog.pressure.contains(self.pressure),
            humedad_alert: !catalog.humidity.contains(self.humidity),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn raw(temp: f64, pres: f64, hum: f64) -> RawReading {
        // ---
        RawReading {
            sensor_id: 1,
            lectura_id: 42,
            fecha_hora: "2025-03-26 18:45:00".to_string(),
            temperatura: temp,
            presion: pres,
            humedad: hum,
        }
    }

    fn reading(temp: f64, pres: f64, hum: f64) -> Reading {
        raw(temp, pres, hum).to_reading().unwrap()
    }

    #[test]
    fn test_timestamp_parsing() {
        // ---
        let r = raw(25.0, 1020.0, 50.0).to_reading().unwrap();
        assert_eq!(r.taken_at.format(WIRE_TIME_FORMAT).to_string(), "2025-03-26 18:45:00");
        assert_eq!(r.sensor_id, 1);
        assert_eq!(r.reading_id, 42);

        let mut bad = raw(25.0, 1020.0, 50.0);
        bad.fecha_hora = "2025-03-26T18:45:00Z".to_string();
        assert!(bad.to_reading().is_err());
    }

    #[test]
    fn test_in_range_reading_not_classified() {
        // ---
        let catalog = RangeCatalog::default();
        assert_eq!(catalog.classify(&reading(25.0, 1020.0, 50.0)), None);

        // Bound edges are in range on both ends
        assert_eq!(catalog.classify(&reading(20.00, 1020.0, 50.0)), None);
        assert_eq!(catalog.classify(&reading(29.99, 1020.0, 50.0)), None);
        assert_eq!(catalog.classify(&reading(25.0, 1000.0, 50.0)), None);
        assert_eq!(catalog.classify(&reading(25.0, 1049.9, 50.0)), None);
        assert_eq!(catalog.classify(&reading(25.0, 1020.0, 30.0)), None);
        assert_eq!(catalog.classify(&reading(25.0, 1020.0, 99.9)), None);
    }

    #[test]
    fn test_each_violation_kind() {
        // ---
        let catalog = RangeCatalog::default();
        assert_eq!(catalog.classify(&reading(19.9, 1020.0, 50.0)), Some(AlertKind::LowTemperature));
        assert_eq!(catalog.classify(&reading(35.0, 1020.0, 50.0)), Some(AlertKind::HighTemperature));
        assert_eq!(catalog.classify(&reading(25.0, 999.0, 50.0)), Some(AlertKind::LowPressure));
        assert_eq!(catalog.classify(&reading(25.0, 1050.0, 50.0)), Some(AlertKind::HighPressure));
        assert_eq!(catalog.classify(&reading(25.0, 1020.0, 29.9)), Some(AlertKind::LowHumidity));
        assert_eq!(catalog.classify(&reading(25.0, 1020.0, 100.0)), Some(AlertKind::HighHumidity));
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // ---
        let catalog = RangeCatalog::default();

        // All three metrics out of range: temperature wins
        assert_eq!(
            catalog.classify(&reading(35.0, 1050.5, 100.0)),
            Some(AlertKind::HighTemperature)
        );

        // Pressure and humidity out of range: pressure wins
        assert_eq!(
            catalog.classify(&reading(25.0, 999.0, 100.0)),
            Some(AlertKind::LowPressure)
        );

        // Low side of a metric is checked before the high side
        assert_eq!(catalog.classify(&reading(19.0, 999.0, 20.0)), Some(AlertKind::LowTemperature));
    }

    #[test]
    fn test_wire_codes() {
        // ---
        assert_eq!(AlertKind::LowTemperature.wire_code(), 1);
        assert_eq!(AlertKind::HighTemperature.wire_code(), 2);
        assert_eq!(AlertKind::LowPressure.wire_code(), 3);
        assert_eq!(AlertKind::HighPressure.wire_code(), 4);
        assert_eq!(AlertKind::LowHumidity.wire_code(), 5);
        assert_eq!(AlertKind::HighHumidity.wire_code(), 6);
    }

    #[test]
    fn test_reading_row_flags_are_independent() {
        // ---
        let catalog = RangeCatalog::default();

        // Classification stops at the first violation but the row flags
        // report every out-of-range field for rendering.
        let row = reading(35.0, 1050.5, 20.0).to_row(&catalog);
        assert!(row.temperatura_alert);
        assert!(row.presion_alert);
        assert!(row.humedad_alert);

        let row = reading(25.0, 1020.0, 50.0).to_row(&catalog);
        assert!(!row.temperatura_alert);
        assert!(!row.presion_alert);
        assert!(!row.humedad_alert);
        assert_eq!(row.fecha_hora, "2025-03-26 18:45:00");
    }
}
