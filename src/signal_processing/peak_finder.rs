use serde::Serialize;

use crate::error::{QrsError, Result};

/// Offset subtracted from the boundary value when padding, so that a
/// monotone run into either edge still yields a peak at the edge.
const BOUNDARY_EPSILON: f64 = 1e-6;

/// A local maximum of the integrated signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakCandidate {
    /// Index into the integrated signal
    pub index: usize,
    /// Integrated signal value at `index`
    pub value: f64,
}

/// Strict local-maximum finder with minimum spacing and amplitude limit
///
/// A sample is a peak when it is strictly greater than every sample up to
/// `spacing` positions before and after it. The sequence is padded on both
/// ends with `spacing` copies of its boundary value minus a small epsilon,
/// so edges neither hide nor invent peaks. Equal neighbours disqualify a
/// peak. When a `limit` is set, a peak must also be strictly above it.
#[derive(Debug, Clone)]
pub struct PeakFinder {
    spacing: usize,
    limit: Option<f64>,
}

impl PeakFinder {
    /// Create a new peak finder
    ///
    /// # Arguments
    /// * `spacing` - Neighbourhood half-width in samples (at least 1)
    /// * `limit` - Optional amplitude a peak must exceed
    ///
    /// # Errors
    /// Returns `QrsError::Config` if `spacing` is zero
    pub fn new(spacing: usize, limit: Option<f64>) -> Result<Self> {
        if spacing == 0 {
            return Err(QrsError::Config(
                "peak spacing must be at least 1 sample".to_string(),
            ));
        }
        Ok(Self { spacing, limit })
    }

    pub fn spacing(&self) -> usize {
        self.spacing
    }

    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Find peak indices in ascending order
    pub fn find_peaks(&self, data: &[f64]) -> Vec<usize> {
        let (Some(&first), Some(&last)) = (data.first(), data.last()) else {
            return Vec::new();
        };

        let len = data.len();
        let spacing = self.spacing;

        let mut padded = Vec::with_capacity(len + 2 * spacing);
        padded.extend(std::iter::repeat_n(first - BOUNDARY_EPSILON, spacing));
        padded.extend_from_slice(data);
        padded.extend(std::iter::repeat_n(last - BOUNDARY_EPSILON, spacing));

        (0..len)
            .filter(|&i| {
                let center = padded[spacing + i];
                (0..spacing).all(|s| {
                    let before = padded[spacing - s - 1 + i];
                    let after = padded[spacing + s + 1 + i];
                    center > before && center > after
                })
            })
            .filter(|&i| self.limit.is_none_or(|limit| data[i] > limit))
            .collect()
    }

    /// Find peaks and pair each index with its value
    pub fn find_candidates(&self, data: &[f64]) -> Vec<PeakCandidate> {
        self.find_peaks(data)
            .into_iter()
            .map(|index| PeakCandidate {
                index,
                value: data[index],
            })
            .collect()
    }
}
