//! CLI Output Formatting.
//!
//! Handles output formatting for text and JSON.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::view::render::Palette;
use console::Style;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
    /// Pretty JSON format
    JsonPretty,
}

impl OutputFormat {
    /// Whether this is one of the JSON formats
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    /// Output format
    format: OutputFormat,
    /// Color enabled
    color: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    /// Enable or disable color
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether color is enabled
    pub fn color(&self) -> bool {
        self.color
    }

    fn palette(&self) -> Palette {
        Palette::new(self.color)
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        self.status_line("success", "✓", Style::new().green(), message);
    }

    /// Print error message (stderr in text mode)
    pub fn error(&self, message: &str) {
        if self.format.is_json() {
            self.print_json(&status_value("error", message));
        } else {
            eprintln!("{} {}", self.palette().paint("Error:", Style::new().red().bold()), message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        self.status_line("warning", "⚠", Style::new().yellow(), message);
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        self.status_line("info", "ℹ", Style::new().blue(), message);
    }

    fn status_line(&self, status: &str, marker: &str, style: Style, message: &str) {
        if self.format.is_json() {
            self.print_json(&status_value(status, message));
        } else {
            println!("{} {}", self.palette().paint(marker, style), message);
        }
    }

    /// Print serializable data as JSON, or `text` in text mode
    pub fn data<T: Serialize>(&self, data: &T, text: &str) {
        if self.format.is_json() {
            self.print_json(data);
        } else {
            print!("{}", text);
        }
    }

    /// Print table
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        if self.format.is_json() {
            let data: Vec<BTreeMap<&str, &str>> = rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .zip(row.iter())
                        .map(|(h, v)| (*h, v.as_str()))
                        .collect()
                })
                .collect();
            self.print_json(&data);
        } else {
            print!("{}", self.table_text(headers, rows));
        }
    }

    /// Render a text table
    pub fn table_text(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        if headers.is_empty() {
            return String::new();
        }

        // Column widths
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let pad = |cell: &str, width: usize| format!("{:width$}", cell, width = width);

        let header_line: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| pad(h, widths[i]))
            .collect();

        let mut out = format!("{}\n", self.palette().bold(header_line.join(" | ").trim_end()));

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&separator.join("-+-"));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
                .collect();
            out.push_str(cells.join(" | ").trim_end());
            out.push('\n');
        }
        out
    }

    /// Print JSON data
    fn print_json<T: Serialize + ?Sized>(&self, data: &T) {
        let output = if matches!(self.format, OutputFormat::JsonPretty) {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };

        if let Ok(json) = output {
            println!("{}", json);
        }
    }
}

/// JSON body of a status line
pub fn status_value(status: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "status": status, "message": message })
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("json-pretty".parse::<OutputFormat>().unwrap(), OutputFormat::JsonPretty);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputFormat::Json).with_color(false);
        assert_eq!(formatter.format(), OutputFormat::Json);
        assert!(!formatter.color());
    }

    #[test]
    fn test_table_text() {
        let formatter = OutputFormatter::default().with_color(false);
        let out = formatter.table_text(
            &["ID", "Name"],
            &[
                vec!["1".into(), "pos".into()],
                vec!["12".into(), "blockchain".into()],
            ],
        );

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID | Name");
        assert_eq!(lines[1], "---+-----------");
        assert_eq!(lines[2], "1  | pos");
        assert_eq!(lines[3], "12 | blockchain");
    }

    #[test]
    fn test_table_without_headers() {
        let formatter = OutputFormatter::default();
        assert!(formatter.table_text(&[], &[vec!["x".into()]]).is_empty());
    }

    #[test]
    fn test_error_status_value() {
        let value = status_value("error", "Connection error: refused");
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Connection error: refused");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
