use console::style;
use serde::Serialize;

use crate::error::{Result, SkmError};
use crate::ops::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| SkmError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Hand back the value of a successful outcome, printing the outcome first in
/// JSON mode. A failed outcome becomes the error `main` reports.
pub fn finish<T: Serialize>(format: OutputFormat, outcome: Outcome<T>) -> Result<T> {
    if format == OutputFormat::Json && outcome.success {
        emit_json(&outcome)?;
    }
    outcome.into_result()
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(format!("{key:width$}", width = self.key_width)).dim();
        self.lines.push(format!("{key_style} {value}"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_joins_lines_in_order() {
        console::set_colors_enabled(false);
        let mut layout = HumanLayout::new();
        layout.section("Skills").bullet("one").blank().push_line("done");
        assert_eq!(layout.build(), "Skills\n------\n- one\n\ndone");
    }

    #[test]
    fn kv_pads_keys() {
        console::set_colors_enabled(false);
        let mut layout = HumanLayout::new();
        layout.kv("Name", "demo");
        assert_eq!(layout.build(), format!("{:18} demo", "Name"));
    }

    #[test]
    fn failed_outcome_becomes_error() {
        let outcome: Outcome<u8> = Outcome::failed(&SkmError::NotInstalled("gone".to_string()));
        let err = finish(OutputFormat::Human, outcome).unwrap_err();
        assert_eq!(err.code(), "not_installed");
    }
}
