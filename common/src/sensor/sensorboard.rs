// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use crate::StationError;

pub type SensorBoardPointer = Box<dyn SensorBoard + Send>;

/// The environmental sensor board.
///
/// Each accessor returns the current value, or `None` when the sensor is not
/// fitted or has nothing to report. An `Err` means the board itself could not
/// be read.
pub trait SensorBoard {
    /// Temperature in degrees Celsius.
    fn temperature(&mut self) -> Result<Option<f64>, StationError>;

    /// Relative humidity in percent.
    fn humidity(&mut self) -> Result<Option<f64>, StationError>;

    /// Ambient light in lux.
    fn ambient_light(&mut self) -> Result<Option<f64>, StationError>;

    /// Barometric pressure in kPa.
    fn pressure(&mut self) -> Result<Option<f64>, StationError>;
}

impl<B: SensorBoard + ?Sized> SensorBoard for Box<B> {
    fn temperature(&mut self) -> Result<Option<f64>, StationError> {
        (**self).temperature()
    }

    fn humidity(&mut self) -> Result<Option<f64>, StationError> {
        (**self).humidity()
    }

    fn ambient_light(&mut self) -> Result<Option<f64>, StationError> {
        (**self).ambient_light()
    }

    fn pressure(&mut self) -> Result<Option<f64>, StationError> {
        (**self).pressure()
    }
}
