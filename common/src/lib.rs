//! # Enviro station
//!
//! Samples the environmental sensor board and a soil moisture probe, shows
//! the values on a small display, keeps a local CSV record and forwards
//! readings to a telemetry endpoint.
//!
//! The sampling loop only talks to its collaborators through the traits in
//! [`sensor`], [`serial`], [`display`] and [`cloud`], so every piece of
//! hardware can be swapped for a scripted stand-in.

pub mod cloud;
pub mod display;
pub mod error;
pub mod eventlog;
pub mod reading;
pub mod retry;
pub mod sampling;
pub mod sensor;
pub mod serial;

pub use error::StationError;
pub use eventlog::EventLog;
pub use reading::Reading;
pub use retry::RetryPolicy;
pub use sampling::{Cadence, SamplingLoop};

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Convenience helper for asking a running loop to stop, for example from a
/// signal handler or from the thread that owns the station.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct Shutdown(Arc<(Mutex<bool>, Condvar)>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks everyone waiting on this token to stop.
    pub fn trigger(&self) {
        let (flag, wakeup) = &*self.0;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        let (flag, _) = &*self.0;
        *flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for `duration`, or less if the token fires first.
    ///
    /// Returns `true` if the token has fired.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (flag, wakeup) = &*self.0;
        let mut triggered = flag.lock().unwrap_or_else(PoisonError::into_inner);

        // too far out to represent, so only the token can end the wait
        let Some(deadline) = Instant::now().checked_add(duration) else {
            while !*triggered {
                triggered = wakeup
                    .wait(triggered)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            return true;
        };

        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            triggered = wakeup
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        *triggered
    }
}

#[test]
fn test_shutdown_cuts_sleep_short() {
    let shutdown = Shutdown::new();
    let remote = shutdown.clone();

    let waiter = std::thread::spawn(move || {
        let start = Instant::now();
        let stopped = remote.sleep(Duration::from_secs(30));
        (stopped, start.elapsed())
    });
    std::thread::sleep(Duration::from_millis(50));
    shutdown.trigger();

    let (stopped, elapsed) = waiter.join().unwrap();
    assert!(stopped);
    assert!(elapsed < Duration::from_secs(30));
    assert!(shutdown.is_triggered());
}

#[test]
fn test_sleep_past_the_end_of_time() {
    let shutdown = Shutdown::new();
    shutdown.trigger();

    assert!(shutdown.sleep(Duration::from_secs(u64::MAX)));
}

#[test]
fn test_sleep_without_shutdown() {
    let shutdown = Shutdown::new();

    assert!(!shutdown.sleep(Duration::from_millis(10)));
    assert!(!shutdown.is_triggered());
}
