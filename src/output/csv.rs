use super::Formatter;
use crate::curve::CellEstimate;
use crate::error::Result;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, window: usize, cell: &CellEstimate) -> Result<String> {
        Ok(format!(
            "{},{:.6},{:.6},{},{},{}",
            window,
            cell.frequency,
            cell.ellipticity,
            cell.vertical_amplitude,
            cell.horizontal_amplitude,
            cell.accepted_cycles
        ))
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "window,frequency_hz,ellipticity,vertical_amplitude,horizontal_amplitude,accepted_cycles",
        )
    }
}
