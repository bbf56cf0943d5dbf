use serde::Serialize;

use super::Formatter;
use crate::curve::CellEstimate;
use crate::error::Result;

/// One JSON object per line; non-finite values become `null`
pub struct JsonFormatter;

#[derive(Serialize)]
struct CellLine<'a> {
    window: usize,
    #[serde(flatten)]
    cell: &'a CellEstimate,
}

impl Formatter for JsonFormatter {
    fn format(&self, window: usize, cell: &CellEstimate) -> Result<String> {
        Ok(serde_json::to_string(&CellLine { window, cell })?)
    }
}
