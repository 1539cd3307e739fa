//! Status lines shown while a workflow runs

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Kind of status line, which decides its marker and its stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Progress,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    /// Warnings and errors go to stderr, everything else to stdout
    pub fn uses_stderr(self) -> bool {
        matches!(self, StatusKind::Warning | StatusKind::Error)
    }

    pub fn render(self, message: &str) -> String {
        match self {
            StatusKind::Info | StatusKind::Progress => message.to_string(),
            StatusKind::Success => format!("✅ {message}"),
            StatusKind::Warning => format!("⚠️  {message}"),
            StatusKind::Error => format!("❌ {message}"),
        }
    }
}

/// Writes status lines to an output and an error stream
pub struct StatusDisplay<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
}

impl StatusDisplay<io::Stdout, io::Stderr> {
    pub fn terminal() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> StatusDisplay<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Write one line; a closed stream is logged, not fatal
    pub fn show(&self, kind: StatusKind, message: &str) {
        let line = kind.render(message);
        let result = if kind.uses_stderr() {
            write_line(&self.err, &line)
        } else {
            write_line(&self.out, &line)
        };

        if let Err(e) = result {
            tracing::debug!("Could not write status line: {}", e);
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (
            self.out.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.err.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

fn write_line<W: Write>(target: &Mutex<W>, line: &str) -> io::Result<()> {
    let mut writer = target.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(writer, "{line}")?;
    writer.flush()
}
