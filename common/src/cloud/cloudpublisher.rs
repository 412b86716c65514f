// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::cloud::cloudconfig::CloudConfig;
use crate::cloud::publisher::Publisher;
use crate::{Reading, StationError};

/// The JSON body of every publish.
#[derive(Serialize)]
struct Message<'a> {
    device_id: &'a str,
    reading: &'a Reading,
}

/// Publishes readings to an HTTP telemetry endpoint.
///
/// The connection pool lives as long as the publisher; it is released when the
/// publisher is dropped, whether the sampling loop ended normally or not.
pub struct CloudPublisher {
    config: CloudConfig,
    agent: ureq::Agent,
    published: u64,
}

impl CloudPublisher {
    /// Loads the config at `path` and opens a publisher for it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let config = CloudConfig::load(path)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: CloudConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        if config.enabled && config.endpoint.is_empty() {
            log::warn!("Cloud publishing enabled without an endpoint, publishing disabled");
        } else if config.enabled {
            log::info!(
                "Publishing as {} to {}",
                config.device_id,
                config.endpoint
            );
        }

        Self {
            config,
            agent,
            published: 0,
        }
    }

    /// Number of messages accepted by the endpoint so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl Publisher for CloudPublisher {
    fn enabled(&self) -> bool {
        self.config.enabled && !self.config.endpoint.is_empty()
    }

    fn publish_message(&mut self, reading: &Reading) -> Result<(), StationError> {
        let body = serde_json::to_string(&Message {
            device_id: &self.config.device_id,
            reading,
        })?;

        let mut request = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json");
        if let Some(token) = &self.config.auth_token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request.send_string(&body)?;
        self.published += 1;
        log::info!(
            "Published reading from {} ({})",
            reading.time,
            response.status()
        );

        Ok(())
    }
}

impl Drop for CloudPublisher {
    fn drop(&mut self) {
        if self.enabled() {
            log::info!("Closing cloud publisher after {} messages", self.published);
        }
    }
}
