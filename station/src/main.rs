use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use enviro_station_common::cloud::{CloudConfig, CloudPublisher};
use enviro_station_common::display::{Display, TerminalDisplay};
use enviro_station_common::sensor::{DummyBoard, IioBoard, SensorBoardPointer};
use enviro_station_common::serial::{self, DummySerial, LineSource, SerialLine};
use enviro_station_common::{Cadence, EventLog, RetryPolicy, SamplingLoop, Shutdown};

/// Samples the enviro board and soil probe, shows the values, logs them
/// locally and uploads them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Measurement display duration (seconds)
    #[arg(long = "display_duration", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    display_duration: u64,

    /// Cloud upload delay (seconds)
    #[arg(long = "upload_delay", default_value_t = 15)]
    upload_delay: u64,

    /// Cloud config file [default: cloud_config.toml next to the executable]
    #[arg(long = "cloud_config")]
    cloud_config: Option<PathBuf>,

    /// Serial device of the moisture probe's microcontroller
    #[arg(long = "serial_port", default_value = serial::DEFAULT_PORT)]
    serial_port: PathBuf,

    /// Local CSV log
    #[arg(long = "event_log", default_value = EventLog::DEFAULT_PATH)]
    event_log: PathBuf,

    /// Where the board's IIO devices live
    #[arg(long = "iio_root", default_value = IioBoard::DEFAULT_ROOT)]
    iio_root: PathBuf,

    /// How many times the sampling loop is started before giving up
    #[arg(long = "max_attempts", default_value_t = 2)]
    max_attempts: u32,

    /// Pause between attempts (seconds)
    #[arg(long = "retry_backoff", default_value_t = 0)]
    retry_backoff: u64,

    /// Replay bundled sample data instead of reading the hardware
    #[arg(long)]
    simulate: bool,
}

type Station = SamplingLoop<SensorBoardPointer, Box<dyn LineSource>, Box<dyn Display>>;

/// Our App struct that holds the station and everything needed to run it.
struct App {
    station: Station,
    cloud_config: PathBuf,
    retry: RetryPolicy,
    shutdown: Shutdown,
}

impl App {
    /// Create a new App struct.
    ///
    /// Opens the hardware, or the simulated stand-ins when `--simulate` is given.
    fn new(args: Args) -> anyhow::Result<Self> {
        let (board, serial) = if args.simulate {
            log::info!("Simulating sensors");
            let board = DummyBoard::new().context("failed to load simulated samples")?;
            let serial: Box<dyn LineSource> = Box::new(DummySerial::new(board.serial_lines()));
            let board: SensorBoardPointer = Box::new(board);
            (board, serial)
        } else {
            let board: SensorBoardPointer = Box::new(IioBoard::open(&args.iio_root)?);
            let serial: Box<dyn LineSource> =
                Box::new(SerialLine::open(&args.serial_port).with_context(|| {
                    format!("failed to open serial port {}", args.serial_port.display())
                })?);
            (board, serial)
        };

        let cadence = Cadence::from_secs(args.display_duration, args.upload_delay);
        let display: Box<dyn Display> = Box::new(TerminalDisplay::stdout());
        let station = SamplingLoop::new(
            board,
            serial,
            display,
            EventLog::new(args.event_log),
            cadence,
        );

        Ok(Self {
            station,
            cloud_config: args
                .cloud_config
                .unwrap_or_else(CloudConfig::default_location),
            retry: RetryPolicy::new(args.max_attempts, Duration::from_secs(args.retry_backoff)),
            shutdown: Shutdown::new(),
        })
    }

    /// Run the sampling loop, starting it again as the retry policy allows.
    ///
    /// Every attempt opens its own cloud publisher, which is closed again when
    /// the attempt ends.
    fn run(&mut self) -> anyhow::Result<()> {
        let Self {
            station,
            cloud_config,
            retry,
            shutdown,
        } = self;

        retry.run(|attempt| {
            log::debug!("Starting sampling loop, attempt {attempt}");
            let mut cloud = CloudPublisher::open(&*cloud_config)?;
            station.run(&mut cloud, shutdown)
        })?;

        Ok(())
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut app = App::new(args)?;

    app.run().inspect_err(|e| log::error!("Giving up: {e:#}"))
}
