use super::Formatter;
use crate::curve::CellEstimate;
use crate::error::Result;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, window: usize, cell: &CellEstimate) -> Result<String> {
        // An infinite ratio still stacked cycles; only an empty stack is
        // reported as such.
        let ellipticity = if cell.accepted_cycles == 0 {
            "no cycles".to_string()
        } else {
            format!("{:>9.4}", cell.ellipticity)
        };
        Ok(if self.verbose {
            format!(
                "Window {:>3}  {:>9.4} Hz  H/V: {} [V: {:.3e}, H: {:.3e}, cycles: {}]",
                window,
                cell.frequency,
                ellipticity,
                cell.vertical_amplitude,
                cell.horizontal_amplitude,
                cell.accepted_cycles
            )
        } else {
            format!(
                "Window {:>3}  {:>9.4} Hz  H/V: {}",
                window, cell.frequency, ellipticity
            )
        })
    }
}
