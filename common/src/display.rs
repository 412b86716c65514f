use std::io::Write;

use crate::StationError;

/// A small text display that keeps showing the last page drawn on it.
pub trait Display {
    fn show(&mut self, text: &str) -> Result<(), StationError>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn show(&mut self, text: &str) -> Result<(), StationError> {
        (**self).show(text)
    }
}

/// Draws pages on an ANSI terminal, replacing whatever was shown before.
pub struct TerminalDisplay<W> {
    out: W,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    const CLEAR: &'static str = "\x1b[2J\x1b[H";

    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn show(&mut self, text: &str) -> Result<(), StationError> {
        writeln!(self.out, "{}{}", Self::CLEAR, text).map_err(StationError::Display)?;
        self.out.flush().map_err(StationError::Display)
    }
}

#[test]
fn test_terminal_display() {
    let mut display = TerminalDisplay::new(Vec::new());
    display.show("Temp: 21.50 C\nRH: 40.00 %").unwrap();
    display.show("Light: 1.00 lux").unwrap();

    let out = String::from_utf8(display.into_inner()).unwrap();
    assert_eq!(
        out,
        "\x1b[2J\x1b[HTemp: 21.50 C\nRH: 40.00 %\n\x1b[2J\x1b[HLight: 1.00 lux\n"
    );
}
