mod csv;
mod json;
mod text;

use std::str::FromStr;

use crate::curve::{CellEstimate, EllipticityCurve};
use crate::error::{RaydecError, Result};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = RaydecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(RaydecError::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Renders curve cells one line at a time
pub trait Formatter: Send {
    fn format(&self, window: usize, cell: &CellEstimate) -> Result<String>;

    fn header(&self) -> Option<&'static str> {
        None
    }

    /// Header plus one line per cell, windows outermost
    fn render(&self, curve: &EllipticityCurve) -> Result<String> {
        let mut lines = Vec::with_capacity(curve.fsteps() * curve.nwind() + 1);
        if let Some(header) = self.header() {
            lines.push(header.to_string());
        }
        for window in 0..curve.nwind() {
            for step in 0..curve.fsteps() {
                lines.push(self.format(window, &curve.cell(step, window))?);
            }
        }
        Ok(lines.join("\n"))
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
