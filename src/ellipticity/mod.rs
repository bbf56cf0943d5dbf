pub mod cycle_analyzer;
pub mod processor;
pub mod stacker;

pub use cycle_analyzer::{CycleAnalyzer, CycleCounts, CycleRecord, azimuth, correlation, project};
pub use processor::{RaydecProcessor, analyze_cell, analyze_window, raydec};
pub use stacker::{StackedAmplitudes, Stacker};
