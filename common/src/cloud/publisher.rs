// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use crate::{Reading, StationError};

/// The remote side readings are forwarded to.
pub trait Publisher {
    /// Whether publishing is switched on.
    fn enabled(&self) -> bool;

    /// Sends one reading.
    fn publish_message(&mut self, reading: &Reading) -> Result<(), StationError>;
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn publish_message(&mut self, reading: &Reading) -> Result<(), StationError> {
        (**self).publish_message(reading)
    }
}
