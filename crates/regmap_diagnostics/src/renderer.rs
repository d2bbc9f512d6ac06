//! Terminal rendering for diagnostics.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E301]: address ranges overlap: [0x0, 0x100) and [0x80, 0x180)
///   --> chip0.ctrl
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders a single diagnostic into a formatted string.
    pub fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        // Header line: severity[CODE]: message
        let header = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
        if self.color {
            let color_code = match diag.severity {
                Severity::Error => "\x1b[31;1m",
                Severity::Warning => "\x1b[33;1m",
                Severity::Note => "\x1b[36;1m",
            };
            out.push_str(&format!("{color_code}{header}\x1b[0m\n"));
        } else {
            out.push_str(&header);
            out.push('\n');
        }

        if let Some(origin) = &diag.origin {
            out.push_str(&format!("  --> {origin}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
