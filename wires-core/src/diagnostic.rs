//! Human-readable error reports pointing into the circuit text.

use crate::error::CoreError;
use crate::span::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A message with an optional code and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: Option<Position>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            position,
        }
    }

    pub fn warning(message: impl Into<String>, position: Option<Position>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message, position)
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Render the message followed by the offending line and a caret.
    ///
    /// ```text
    /// error[E0102]: lex error: no token matches `AM` at 1:4
    ///  --> 1:4
    ///   |
    /// 1 | x AMD y -> d
    ///   |    ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let mut out = match self.code {
            Some(code) => format!("{label}[{code}]: {}\n", self.message),
            None => format!("{label}: {}\n", self.message),
        };

        let Some(position) = self.position else {
            return out;
        };
        let text = source
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or("");
        let gutter = position.line.to_string().len();
        // Tabs are copied into the marker so the caret lines up under them.
        let marker: String = text
            .chars()
            .take(position.column.saturating_sub(1))
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();

        out.push_str(&format!("{:gutter$}--> {position}\n", ""));
        out.push_str(&format!("{:gutter$} |\n", ""));
        out.push_str(&format!("{} | {text}\n", position.line));
        out.push_str(&format!("{:gutter$} | {marker}^\n", ""));
        out
    }
}

impl From<&CoreError> for Diagnostic {
    fn from(err: &CoreError) -> Self {
        Diagnostic::error(err.to_string(), err.position()).with_code(err.code())
    }
}
