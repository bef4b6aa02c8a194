pub mod conditioning;
pub mod filters;
pub mod peak_finder;

pub use conditioning::{differentiate, integrate, square};
pub use filters::{BandpassFilter, bandpass_filter};
pub use peak_finder::{PeakCandidate, PeakFinder};
