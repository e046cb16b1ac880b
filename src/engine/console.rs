//! Console reporter: renders progress (overwritable) and result (permanent) lines.
//!
//! Only this module writes to stdout during a search, so lines from different workers never
//! interleave.

use colored::Colorize;
use crossbeam_channel::Receiver;
use std::io::{self, Write};

use crate::ConsoleEvent;
use crate::pipeline::CancelToken;

/// Writer that owns the cursor state of one terminal line.
///
/// `previous` is the text of the last line while it is still ephemeral, `None` once a permanent
/// line (or nothing) has been written.
pub struct ConsoleWriter<W: Write> {
    out: W,
    width: Option<usize>,
    colorize: bool,
    previous: Option<String>,
}

impl<W: Write> ConsoleWriter<W> {
    /// `width` truncates progress lines; `colorize` paints progress yellow and results green.
    pub fn new(out: W, width: Option<usize>, colorize: bool) -> Self {
        Self {
            out,
            width,
            colorize,
            previous: None,
        }
    }

    pub fn write_event(&mut self, event: &ConsoleEvent) -> io::Result<()> {
        let text = event.path().display().to_string();
        match event {
            ConsoleEvent::Progress(_) => self.progress(&text),
            ConsoleEvent::Result(_) => self.result(&text),
        }
    }

    /// Overwritable line, truncated to the terminal width. No newline.
    pub fn progress(&mut self, text: &str) -> io::Result<()> {
        let text = match self.width {
            Some(w) if text.chars().count() > w => text.chars().take(w).collect(),
            _ => text.to_string(),
        };
        self.render(&text, true)
    }

    /// Permanent line.
    pub fn result(&mut self, text: &str) -> io::Result<()> {
        self.render(text, false)
    }

    fn render(&mut self, text: &str, ephemeral: bool) -> io::Result<()> {
        let mut line = String::with_capacity(text.len() + 2);
        let pad = match self.previous.take() {
            Some(prev) => {
                line.push('\r');
                prev.chars().count().saturating_sub(text.chars().count())
            }
            None => 0,
        };
        line.push_str(&self.paint(text, ephemeral));
        line.extend(std::iter::repeat_n(' ', pad));
        if !ephemeral {
            line.push('\n');
        }
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        if ephemeral {
            self.previous = Some(text.to_string());
        }
        Ok(())
    }

    fn paint(&self, text: &str, ephemeral: bool) -> String {
        match (self.colorize, ephemeral) {
            (false, _) => text.to_string(),
            (true, true) => text.yellow().to_string(),
            (true, false) => text.green().to_string(),
        }
    }

    /// Blank out a trailing progress line so nothing ephemeral is left on screen.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(prev) = self.previous.take() {
            let blank = " ".repeat(prev.chars().count());
            write!(self.out, "\r{blank}\r")?;
        }
        self.out.flush()
    }

    /// True while the last written line may still be overwritten.
    pub fn is_ephemeral(&self) -> bool {
        self.previous.is_some()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Drain `console_rx` into `writer` until every sender is gone, then blank any trailing
/// progress line. After cancellation progress events are skipped, results still print.
pub fn run_reporter<W: Write>(
    console_rx: &Receiver<ConsoleEvent>,
    writer: &mut ConsoleWriter<W>,
    cancel: &CancelToken,
) -> io::Result<usize> {
    let mut results = 0_usize;
    for event in console_rx.iter() {
        if event.is_ephemeral() && cancel.is_cancelled() {
            continue;
        }
        writer.write_event(&event)?;
        if !event.is_ephemeral() {
            results += 1;
        }
    }
    writer.finish()?;
    Ok(results)
}

/// Current terminal width in columns, if stdout is a terminal.
pub fn terminal_width() -> Option<usize> {
    console::Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| cols as usize)
}
