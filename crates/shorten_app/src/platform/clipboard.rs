use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Copies through the terminal with an OSC 52 escape sequence.
///
/// Terminals that do not support OSC 52 ignore the sequence, so success only
/// means the sequence was written.
pub struct Osc52Clipboard<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()
    }
}
