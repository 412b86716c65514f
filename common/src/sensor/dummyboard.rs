// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::Deserialize;

use crate::sensor::sensorboard::SensorBoard;
use crate::StationError;

/// One scripted set of board values plus the line the microcontroller sends
/// alongside them.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DummySample {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ambient_light: Option<f64>,
    pub pressure: Option<f64>,
    #[serde(default)]
    pub moisture_line: String,
}

/// A sensor board that replays scripted samples, for simulation and tests.
///
/// Every sensor walks through the samples on its own and wraps around at the
/// end, so reading all four sensors once per iteration yields one sample per
/// iteration.
#[derive(Deserialize, Default)]
pub struct DummyBoard {
    samples: Vec<DummySample>,
    #[serde(skip)]
    cursors: [usize; 4],
}

impl DummyBoard {
    /// Loads the bundled samples.
    pub fn new() -> Result<Self, serde_json::Error> {
        let json_data = std::include_str!("./dummyboard.json");

        serde_json::from_str::<Self>(json_data)
    }

    pub fn from_samples(samples: Vec<DummySample>) -> Self {
        Self {
            samples,
            cursors: [0; 4],
        }
    }

    pub fn samples(&self) -> &[DummySample] {
        &self.samples
    }

    /// Serial lines matching the samples, newline terminated.
    pub fn serial_lines(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|sample| format!("{}\n", sample.moisture_line))
            .collect()
    }

    fn next(&mut self, sensor: usize, value: fn(&DummySample) -> Option<f64>) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let cursor = &mut self.cursors[sensor];
        let sample = &self.samples[*cursor % self.samples.len()];
        *cursor += 1;
        value(sample)
    }
}

impl SensorBoard for DummyBoard {
    fn temperature(&mut self) -> Result<Option<f64>, StationError> {
        Ok(self.next(0, |s| s.temperature))
    }

    fn humidity(&mut self) -> Result<Option<f64>, StationError> {
        Ok(self.next(1, |s| s.humidity))
    }

    fn ambient_light(&mut self) -> Result<Option<f64>, StationError> {
        Ok(self.next(2, |s| s.ambient_light))
    }

    fn pressure(&mut self) -> Result<Option<f64>, StationError> {
        Ok(self.next(3, |s| s.pressure))
    }
}

#[test]
fn test_dummy_board() {
    let board = DummyBoard::new().unwrap();

    assert_eq!(board.samples().len(), 4);
    assert_eq!(board.samples()[0].temperature, Some(21.347));
    assert_eq!(board.serial_lines()[0], "31.5\n");
}

#[test]
fn test_dummy_board_wraps_around() {
    let mut board = DummyBoard::from_samples(vec![
        DummySample {
            temperature: Some(1.0),
            ..Default::default()
        },
        DummySample {
            temperature: None,
            pressure: Some(99.0),
            ..Default::default()
        },
    ]);

    assert_eq!(board.temperature().unwrap(), Some(1.0));
    assert_eq!(board.temperature().unwrap(), None);
    assert_eq!(board.temperature().unwrap(), Some(1.0));
    assert_eq!(board.pressure().unwrap(), None);
    assert_eq!(board.pressure().unwrap(), Some(99.0));
}

#[test]
fn test_empty_dummy_board() {
    let mut board = DummyBoard::default();

    assert_eq!(board.humidity().unwrap(), None);
    assert!(board.serial_lines().is_empty());
}
