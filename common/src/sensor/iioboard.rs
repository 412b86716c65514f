// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::sensor::sensorboard::SensorBoard;
use crate::StationError;

/// Linux IIO device names of the sensors fitted to the board.
const TEMPERATURE_HUMIDITY_DEVICE: &str = "hdc2010";
const LIGHT_DEVICE: &str = "opt3002";
const PRESSURE_DEVICE: &str = "bmp280";

/// Reads the board's sensors through the Linux IIO sysfs interface.
///
/// Devices are found by the contents of their `name` file. A device that is
/// not present reads as `None`, as does a channel the driver does not expose.
pub struct IioBoard {
    temperature_humidity: Option<PathBuf>,
    light: Option<PathBuf>,
    pressure: Option<PathBuf>,
}

impl IioBoard {
    pub const DEFAULT_ROOT: &'static str = "/sys/bus/iio/devices";

    /// Scans `root` for the board's IIO devices.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StationError> {
        let root = root.as_ref();
        let mut board = Self {
            temperature_humidity: None,
            light: None,
            pressure: None,
        };

        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("No IIO devices at {}", root.display());
                return Ok(board);
            }
            Err(source) => {
                return Err(StationError::Sensor {
                    sensor: "board",
                    source,
                })
            }
        };

        for entry in entries {
            let path = entry
                .map_err(|source| StationError::Sensor {
                    sensor: "board",
                    source,
                })?
                .path();
            let Ok(name) = std::fs::read_to_string(path.join("name")) else {
                continue;
            };
            let slot = match name.trim() {
                TEMPERATURE_HUMIDITY_DEVICE => &mut board.temperature_humidity,
                LIGHT_DEVICE => &mut board.light,
                PRESSURE_DEVICE => &mut board.pressure,
                _ => continue,
            };
            log::info!("Found {} at {}", name.trim(), path.display());
            slot.get_or_insert(path);
        }

        Ok(board)
    }
}

impl SensorBoard for IioBoard {
    fn temperature(&mut self) -> Result<Option<f64>, StationError> {
        let value = read_channel(self.temperature_humidity.as_deref(), "temperature", "in_temp")?;
        Ok(value.map(|milli| milli / 1000.0))
    }

    fn humidity(&mut self) -> Result<Option<f64>, StationError> {
        let value = read_channel(
            self.temperature_humidity.as_deref(),
            "humidity",
            "in_humidityrelative",
        )?;
        Ok(value.map(|milli| milli / 1000.0))
    }

    fn ambient_light(&mut self) -> Result<Option<f64>, StationError> {
        read_channel(self.light.as_deref(), "ambient light", "in_illuminance")
    }

    fn pressure(&mut self) -> Result<Option<f64>, StationError> {
        read_channel(self.pressure.as_deref(), "pressure", "in_pressure")
    }
}

/// Reads `<channel>_input`, falling back to `(raw + offset) * scale`.
fn read_channel(
    device: Option<&Path>,
    sensor: &'static str,
    channel: &str,
) -> Result<Option<f64>, StationError> {
    let Some(device) = device else {
        return Ok(None);
    };

    if let Some(value) = read_attribute(device, sensor, &format!("{channel}_input"))? {
        return Ok(Some(value));
    }
    let Some(raw) = read_attribute(device, sensor, &format!("{channel}_raw"))? else {
        return Ok(None);
    };
    let offset = read_attribute(device, sensor, &format!("{channel}_offset"))?.unwrap_or(0.0);
    let scale = read_attribute(device, sensor, &format!("{channel}_scale"))?.unwrap_or(1.0);

    Ok(Some((raw + offset) * scale))
}

fn read_attribute(
    device: &Path,
    sensor: &'static str,
    attribute: &str,
) -> Result<Option<f64>, StationError> {
    let contents = match std::fs::read_to_string(device.join(attribute)) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StationError::Sensor { sensor, source }),
    };

    contents
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| StationError::SensorData {
            sensor,
            value: contents.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(root: &Path, dir: &str, name: &str, attributes: &[(&str, &str)]) {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("name"), format!("{name}\n")).unwrap();
        for (attribute, value) in attributes {
            std::fs::write(path.join(attribute), format!("{value}\n")).unwrap();
        }
    }

    #[test]
    fn test_reads_processed_channels() {
        let root = tempfile::tempdir().unwrap();
        device(
            root.path(),
            "iio:device0",
            "hdc2010",
            &[("in_temp_input", "23456"), ("in_humidityrelative_input", "41250")],
        );
        device(root.path(), "iio:device1", "opt3002", &[("in_illuminance_input", "315.2")]);
        device(root.path(), "iio:device2", "bmp280", &[("in_pressure_input", "101.325")]);

        let mut board = IioBoard::open(root.path()).unwrap();

        assert_eq!(board.temperature().unwrap(), Some(23.456));
        assert_eq!(board.humidity().unwrap(), Some(41.25));
        assert_eq!(board.ambient_light().unwrap(), Some(315.2));
        assert_eq!(board.pressure().unwrap(), Some(101.325));
    }

    #[test]
    fn test_falls_back_to_raw_offset_scale() {
        let root = tempfile::tempdir().unwrap();
        device(
            root.path(),
            "iio:device0",
            "hdc2010",
            &[
                ("in_temp_raw", "100"),
                ("in_temp_offset", "-50"),
                ("in_temp_scale", "250"),
            ],
        );

        let mut board = IioBoard::open(root.path()).unwrap();

        assert_eq!(board.temperature().unwrap(), Some(12.5));
        assert_eq!(board.humidity().unwrap(), None);
    }

    #[test]
    fn test_missing_devices_read_as_absent() {
        let root = tempfile::tempdir().unwrap();
        device(root.path(), "iio:device0", "some-adc", &[("in_voltage0_raw", "1")]);

        let mut board = IioBoard::open(root.path()).unwrap();

        assert_eq!(board.temperature().unwrap(), None);
        assert_eq!(board.ambient_light().unwrap(), None);
        assert_eq!(board.pressure().unwrap(), None);
    }

    #[test]
    fn test_missing_root_reads_as_absent() {
        let root = tempfile::tempdir().unwrap();

        let mut board = IioBoard::open(root.path().join("nope")).unwrap();

        assert_eq!(board.humidity().unwrap(), None);
    }

    #[test]
    fn test_garbage_value_is_a_fault() {
        let root = tempfile::tempdir().unwrap();
        device(root.path(), "iio:device0", "bmp280", &[("in_pressure_input", "busy")]);

        let mut board = IioBoard::open(root.path()).unwrap();

        assert!(matches!(
            board.pressure(),
            Err(StationError::SensorData { sensor: "pressure", .. })
        ));
    }
}
