use std::path::PathBuf;

/// Everything that can go wrong while sampling, logging or publishing.
///
/// The sampling loop never handles these itself; a fault ends the current
/// loop invocation and is returned to whoever drives it.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// The sensor board could not be read.
    #[error("failed to read {sensor} sensor: {source}")]
    Sensor {
        sensor: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A sensor file exists but does not hold a number.
    #[error("{sensor} sensor returned invalid data {value:?}")]
    SensorData { sensor: &'static str, value: String },

    /// Reading from the microcontroller's serial line failed.
    #[error("failed to read serial line: {0}")]
    SerialRead(#[source] std::io::Error),

    /// The serial line did not contain valid UTF-8.
    #[error("serial line is not valid UTF-8: {0}")]
    SerialDecode(#[from] std::string::FromUtf8Error),

    /// The serial line could not be parsed as a moisture value.
    #[error("invalid moisture value {line:?}: {source}")]
    MoistureParse {
        line: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Drawing on the display failed.
    #[error("failed to update display: {0}")]
    Display(#[source] std::io::Error),

    /// Appending to the local event log failed.
    #[error("failed to append to {}: {source}", .path.display())]
    EventLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cloud configuration file could not be read.
    #[error("failed to read cloud config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cloud configuration file is malformed.
    #[error("invalid cloud config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A reading could not be encoded for publishing.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The telemetry endpoint rejected the message or could not be reached.
    #[error("failed to publish message: {0}")]
    Publish(#[source] Box<ureq::Error>),
}

impl From<ureq::Error> for StationError {
    fn from(err: ureq::Error) -> Self {
        Self::Publish(Box::new(err))
    }
}
