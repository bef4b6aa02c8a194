pub mod classifier;
pub mod detector;

pub use classifier::{AdaptiveClassifier, ClassificationState, Classification, ClassifiedPeaks};
pub use detector::{ConditionedSignals, DetectionResult, QrsDetector};
