use std::time::Duration;

/// How often a failed operation is re-run, and how long to wait in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    /// One retry straight after the first failure.
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Runs `op` until it succeeds or the attempts are used up.
    ///
    /// `op` receives the attempt number, starting at 1. The error of the last
    /// attempt is returned as is.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    log::warn!("Attempt {attempt}/{max_attempts} failed: {e}");
                    if !self.backoff.is_zero() {
                        std::thread::sleep(self.backoff);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
