// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

mod dummyboard;
mod iioboard;
mod sensorboard;

pub use sensorboard::SensorBoard;
pub use sensorboard::SensorBoardPointer;

pub use dummyboard::{DummyBoard, DummySample};
pub use iioboard::IioBoard;
