//! Output sinks: where `print` text and `play` note sequences go.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::value::Value;

/// Receives the arguments of each `print` call.
pub trait TextSink {
    fn print(&mut self, values: &[Value]);
}

/// Receives each numeric sequence handed to `play`, unmodified.
pub trait NoteSink {
    fn play(&mut self, notes: &[Value]);
}

/// One printed line: values separated by a single space.
pub fn format_line(values: &[Value]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

// ─── Stdout ──────────────────────────────────────────────────────────────────

pub struct StdoutSink;

impl TextSink for StdoutSink {
    fn print(&mut self, values: &[Value]) {
        println!("{}", format_line(values));
    }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

/// Records note sequences as tracing events instead of producing audio.
pub struct LogNoteSink;

impl NoteSink for LogNoteSink {
    fn play(&mut self, notes: &[Value]) {
        tracing::info!(count = notes.len(), notes = %format_line(notes), "play");
    }
}

// ─── Capture ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Captured {
    lines: Vec<String>,
    sequences: Vec<Vec<Value>>,
}

/// Keeps everything it receives. Clones share the same buffer, so a test
/// can hand one clone to the interpreter and read the other afterwards.
#[derive(Clone, Default)]
pub struct CaptureSink(Rc<RefCell<Captured>>);

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().lines.clone()
    }

    pub fn sequences(&self) -> Vec<Vec<Value>> {
        self.0.borrow().sequences.clone()
    }
}

impl TextSink for CaptureSink {
    fn print(&mut self, values: &[Value]) {
        self.0.borrow_mut().lines.push(format_line(values));
    }
}

impl NoteSink for CaptureSink {
    fn play(&mut self, notes: &[Value]) {
        self.0.borrow_mut().sequences.push(notes.to_vec());
    }
}
