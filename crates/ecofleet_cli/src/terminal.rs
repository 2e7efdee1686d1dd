//! Interactive terminal implementation of the core `Console` seam.

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use ecofleet_core::{Console, Tone};
use log::warn;
use std::io::{self, BufRead, Write};

/// Line-based console over a reader/writer pair, stdin/stdout by default.
pub struct TerminalConsole<R = io::StdinLock<'static>, W = io::Stdout> {
    input: R,
    output: W,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::with_io(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn write_message(&mut self, tone: Tone, message: &str) -> io::Result<()> {
        let rendered = match tone {
            Tone::Plain => message.normal(),
            Tone::Heading => message.bold().cyan(),
            Tone::Success => message.green(),
            Tone::Failure => message.red(),
            Tone::Notice => message.blue(),
        };
        if tone == Tone::Heading {
            writeln!(self.output)?;
        }
        writeln!(self.output, "{rendered}")
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn show(&mut self, tone: Tone, message: &str) {
        if let Err(err) = self.write_message(tone, message) {
            warn!("event=console_write module=cli status=error op=show error={err}");
        }
    }

    fn clear(&mut self) {
        if let Err(err) = execute!(self.output, Clear(ClearType::All), MoveTo(0, 0)) {
            warn!("event=console_write module=cli status=error op=clear error={err}");
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.read_line("\nPress Enter to continue...") {
            warn!("event=console_write module=cli status=error op=pause error={err}");
        }
    }
}
