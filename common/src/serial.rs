//! The microcontroller that reports soil moisture over a serial line.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::StationError;

/// Where the microcontroller usually shows up.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Line speed of the microcontroller's serial output.
#[cfg(unix)]
const BAUD_RATE: libc::speed_t = libc::B9600;

/// A line-oriented byte source.
pub trait LineSource {
    /// Blocks until a full line is available and returns its raw bytes,
    /// including the terminator. Running out of input is a
    /// [`StationError::SerialRead`] with [`io::ErrorKind::UnexpectedEof`].
    fn read_line(&mut self) -> Result<Vec<u8>, StationError>;
}

impl<L: LineSource + ?Sized> LineSource for Box<L> {
    fn read_line(&mut self) -> Result<Vec<u8>, StationError> {
        (**self).read_line()
    }
}

/// Reads lines from a serial device, or from any other buffered reader.
pub struct SerialLine<R> {
    reader: R,
}

impl SerialLine<BufReader<File>> {
    /// Opens a tty device for reading, raw at 9600 baud 8N1.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let mut options = OpenOptions::new();
        options.read(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOCTTY);
        }

        let file = options
            .open(path.as_ref())
            .map_err(StationError::SerialRead)?;
        #[cfg(unix)]
        make_raw(&file).map_err(StationError::SerialRead)?;

        log::info!("Opened serial line {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

/// Puts the tty into raw mode: no echo, no line editing, no CR/LF
/// translation. Reads block until at least one byte has arrived.
#[cfg(unix)]
fn make_raw(file: &File) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();
    // SAFETY: termios is plain old data and is filled in by tcgetattr
    let mut tty: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut tty) } != 0 {
        return Err(io::Error::last_os_error());
    }

    unsafe {
        libc::cfmakeraw(&mut tty);
        if libc::cfsetispeed(&mut tty, BAUD_RATE) != 0
            || libc::cfsetospeed(&mut tty, BAUD_RATE) != 0
        {
            return Err(io::Error::last_os_error());
        }
    }
    tty.c_cflag &= !libc::CSTOPB;
    tty.c_cflag |= libc::CLOCAL | libc::CREAD;
    tty.c_cc[libc::VMIN] = 1;
    tty.c_cc[libc::VTIME] = 0;

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tty) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn end_of_input() -> StationError {
    StationError::SerialRead(io::ErrorKind::UnexpectedEof.into())
}

impl<R: BufRead> SerialLine<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for SerialLine<R> {
    fn read_line(&mut self) -> Result<Vec<u8>, StationError> {
        let mut line = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut line)
            .map_err(StationError::SerialRead)?;
        if read == 0 {
            return Err(end_of_input());
        }
        Ok(line)
    }
}

/// Replays scripted lines, wrapping around at the end.
#[derive(Default)]
pub struct DummySerial {
    lines: Vec<Vec<u8>>,
    cursor: usize,
}

impl DummySerial {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }
}

impl LineSource for DummySerial {
    fn read_line(&mut self) -> Result<Vec<u8>, StationError> {
        if self.lines.is_empty() {
            return Err(end_of_input());
        }
        let line = self.lines[self.cursor % self.lines.len()].clone();
        self.cursor += 1;
        Ok(line)
    }
}

/// Turns one raw serial line into a moisture value.
///
/// Trailing whitespace is stripped first; an empty line means the
/// microcontroller had nothing to report and reads as `0.0`.
pub fn parse_moisture(raw: Vec<u8>) -> Result<f64, StationError> {
    let text = String::from_utf8(raw)?;
    let line = text.trim_end();
    if line.is_empty() {
        return Ok(0.0);
    }

    line.trim_start()
        .parse::<f64>()
        .map_err(|source| StationError::MoistureParse {
            line: line.to_string(),
            source,
        })
}
