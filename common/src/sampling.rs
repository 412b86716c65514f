//! The read-display-log-publish loop.

use std::time::Duration;

use crate::cloud::Publisher;
use crate::display::Display;
use crate::reading::{round2, timestamp, Reading};
use crate::sensor::SensorBoard;
use crate::serial::{parse_moisture, LineSource};
use crate::{EventLog, Shutdown, StationError};

/// Pacing of the loop: how long each page stays up and how often to publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    pub page_duration: Duration,
    /// Publish on every iteration whose count is a multiple of this. Never 0.
    pub publish_every: u64,
}

impl Cadence {
    /// Derives the cadence from the operator's settings in seconds.
    ///
    /// One iteration is taken to last two page durations, so publishing every
    /// `upload_delay / (2 * display_duration)` iterations approximates the
    /// requested upload delay. The result is at least 1.
    pub fn from_secs(display_duration: u64, upload_delay: u64) -> Self {
        let publish_every = upload_delay
            .checked_div(display_duration.saturating_mul(2))
            .unwrap_or(1)
            .max(1);

        Self {
            page_duration: Duration::from_secs(display_duration),
            publish_every,
        }
    }

    pub fn publish_due(&self, read_count: u64) -> bool {
        read_count % self.publish_every.max(1) == 0
    }
}

/// Owns the station's hardware and drives one reading at a time through it.
pub struct SamplingLoop<B, L, D> {
    board: B,
    serial: L,
    display: D,
    event_log: EventLog,
    cadence: Cadence,
}

impl<B, L, D> SamplingLoop<B, L, D>
where
    B: SensorBoard,
    L: LineSource,
    D: Display,
{
    pub fn new(board: B, serial: L, display: D, event_log: EventLog, cadence: Cadence) -> Self {
        Self {
            board,
            serial,
            display,
            event_log,
            cadence,
        }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs iterations until `shutdown` fires or something fails.
    ///
    /// The iteration count starts at 0 on every call. A started iteration is
    /// always finished; `shutdown` only shortens the page waits and stops the
    /// loop before the next iteration. Returns the number of completed
    /// iterations.
    pub fn run<P: Publisher>(
        &mut self,
        publisher: &mut P,
        shutdown: &Shutdown,
    ) -> Result<u64, StationError> {
        log::info!(
            "Sampling started, {}s per page, publishing every {} readings",
            self.cadence.page_duration.as_secs_f64(),
            self.cadence.publish_every
        );

        let mut read_count = 0;
        while !shutdown.is_triggered() {
            self.step(read_count, publisher, shutdown)?;
            read_count += 1;
        }

        log::info!("Sampling stopped after {read_count} readings");
        Ok(read_count)
    }

    /// One full iteration: sample, show, record and maybe publish.
    pub fn step<P: Publisher>(
        &mut self,
        read_count: u64,
        publisher: &mut P,
        shutdown: &Shutdown,
    ) -> Result<Reading, StationError> {
        let reading = self.sample()?;
        log::debug!("Reading {read_count}: {reading:?}");

        for page in reading.pages() {
            self.display.show(&page)?;
            shutdown.sleep(self.cadence.page_duration);
        }

        self.event_log.append(&reading)?;

        if self.cadence.publish_due(read_count) {
            if publisher.enabled() {
                publisher.publish_message(&reading)?;
            } else {
                log::debug!("Publisher disabled, skipping reading {read_count}");
            }
        }

        Ok(reading)
    }

    /// Reads every sensor once, in board, serial, clock, board order.
    pub fn sample(&mut self) -> Result<Reading, StationError> {
        let temperature = self.board.temperature()?.map(round2);
        let humidity = self.board.humidity()?.map(round2);

        let moisture = parse_moisture(self.serial.read_line()?)?;

        let time = timestamp(chrono::Utc::now());

        let ambient_light = self.board.ambient_light()?.map(round2);
        let pressure = self.board.pressure()?.map(round2);

        Ok(Reading {
            temperature,
            humidity,
            moisture,
            time,
            ambient_light,
            pressure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_from_secs() {
        assert_eq!(Cadence::from_secs(5, 15).publish_every, 1);
        assert_eq!(Cadence::from_secs(5, 60).publish_every, 6);
        assert_eq!(Cadence::from_secs(5, 59).publish_every, 5);
        assert_eq!(
            Cadence::from_secs(5, 60).page_duration,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_cadence_is_never_zero() {
        assert_eq!(Cadence::from_secs(5, 0).publish_every, 1);
        assert_eq!(Cadence::from_secs(30, 15).publish_every, 1);
        assert_eq!(Cadence::from_secs(0, 15).publish_every, 1);
    }

    #[test]
    fn test_publish_due() {
        let cadence = Cadence::from_secs(5, 60);
        let due: Vec<u64> = (0..20).filter(|n| cadence.publish_due(*n)).collect();
        assert_eq!(due, [0, 6, 12, 18]);

        let every = Cadence::from_secs(5, 15);
        assert!((0..5).all(|n| every.publish_due(n)));
    }
}
