pub mod chebyshev;
pub mod conditioning;
pub mod filters;
pub mod math;

pub use chebyshev::{BandpassSpec, chebyshev1_bandpass, chebyshev1_order, design_bandpass};
pub use conditioning::{FilteredChannels, TaperedWindow, detrend, taper};
pub use filters::BandpassFilter;
pub use math::{dot, mean, signum, sum_of_squares, wrap_two_pi};
