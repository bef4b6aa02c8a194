pub mod config;
pub mod ecg_source;
pub mod error;
pub mod output;
pub mod qrs;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::DetectorConfig;
pub use ecg_source::{CsvSource, EcgRecording, EcgSource, RawSample};
pub use error::{QrsError, Result};
pub use qrs::{DetectionResult, QrsDetector};
