use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Column order of the event log and of the published record.
pub const COLUMNS: [&str; 6] = [
    "temperature",
    "humidity",
    "moisture",
    "time",
    "ambient_light",
    "pressure",
];

/// One complete set of sensor values plus the time they were captured.
///
/// Board sensors that yielded nothing are `None`. They stay `None` in the
/// event log (empty field) and the published message (`null`); only the
/// display shows them as `nan`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Reading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Soil moisture reported by the microcontroller, `0.0` for an empty line.
    pub moisture: f64,
    /// UTC capture time, `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub time: String,
    pub ambient_light: Option<f64>,
    pub pressure: Option<f64>,
}

impl Reading {
    /// The three display pages, in the order they are shown.
    pub fn pages(&self) -> [String; 3] {
        [
            format!(
                "Temp: {} C\nRH: {} %",
                display_value(self.temperature),
                display_value(self.humidity)
            ),
            format!(
                "Light: {} lux\nPressure: {} kPa",
                display_value(self.ambient_light),
                display_value(self.pressure)
            ),
            format!(
                "Moisture: {} Mois\nLast time: {}",
                display_value(Some(self.moisture)),
                self.time
            ),
        ]
    }

    /// Formats the reading as one event log row, without the line terminator.
    pub fn csv_row(&self) -> String {
        let mut row = String::new();
        push_field(&mut row, self.temperature);
        row.push(',');
        push_field(&mut row, self.humidity);
        row.push(',');
        push_field(&mut row, Some(self.moisture));
        row.push(',');
        row.push_str(&self.time);
        row.push(',');
        push_field(&mut row, self.ambient_light);
        row.push(',');
        push_field(&mut row, self.pressure);
        row
    }
}

/// Rounds to two decimal places. Exact ties go to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Formats a capture time the way the event log expects it.
///
/// Whole seconds are written without a fractional part.
pub fn timestamp(now: chrono::DateTime<chrono::Utc>) -> String {
    if now.timestamp_subsec_micros() == 0 {
        now.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        now.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn display_value(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.2}"),
        _ => "nan".to_string(),
    }
}

fn push_field(row: &mut String, value: Option<f64>) {
    // `{:?}` keeps a trailing `.0` on whole numbers
    if let Some(v) = value {
        let _ = write!(row, "{v:?}");
    }
}
