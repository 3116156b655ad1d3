//==================================================
// File: debug.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Human-readable resolution trace
// Objective: Emit one framed block per lookup to an optional text sink
//==================================================

use std::fmt;
use std::io::{self, Write};

const RULE_WIDTH: usize = 90;
const TRACE_LABEL: &str = "Autoloader::load_class";

/// Optional trace sink. Write failures are swallowed.
#[derive(Default)]
pub struct DebugTrace {
    sink: Option<Box<dyn Write + Send>>,
}

impl fmt::Debug for DebugTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugTrace")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl DebugTrace {
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Some(Box::new(writer)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn start(&mut self) {
        let rule = centered(&format!("= {TRACE_LABEL} ="), RULE_WIDTH, '=');
        self.write_line(&rule);
    }

    pub fn message(&mut self, message: impl fmt::Display) {
        if self.is_enabled() {
            self.write_line(&message.to_string());
        }
    }

    pub fn end(&mut self) {
        let rule = "=".repeat(RULE_WIDTH);
        self.write_line(&rule);
        self.write_line("");
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.flush();
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = writeln!(sink, "{line}");
        }
    }
}

/// Pad `text` on both sides to `width`, extra fill going right.
fn centered(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let total = width - len;
    let left = total / 2;
    let right = total - left;
    let mut line = String::with_capacity(width);
    line.extend(std::iter::repeat_n(fill, left));
    line.push_str(text);
    line.extend(std::iter::repeat_n(fill, right));
    line
}
