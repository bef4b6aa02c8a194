use crate::error::{QrsError, Result};
use iir_filters::filter::{DirectForm2Transposed, Filter};
use iir_filters::filter_design::{FilterType, butter};
use iir_filters::sos::zpk2sos;

/// Sampling rate used for coefficient design once cutoffs are normalized,
/// so that the Nyquist frequency is exactly 1.
const NORMALIZED_SAMPLE_RATE: f64 = 2.0;

/// Validate band-pass cutoffs and order against a sampling frequency
///
/// A `lowcut` of exactly 0.0 is accepted and selects a low-pass design.
///
/// # Errors
/// Returns `QrsError::InvalidFilterSpec` if `order < 1`, if `lowcut >= highcut`,
/// if `lowcut` is negative, or if either cutoff reaches the Nyquist frequency.
pub fn check_filter_spec(
    lowcut: f64,
    highcut: f64,
    signal_frequency: f64,
    order: usize,
) -> Result<()> {
    let nyquist = 0.5 * signal_frequency;

    if order < 1 {
        return Err(QrsError::InvalidFilterSpec(format!(
            "order must be at least 1, got {}",
            order
        )));
    }
    if !lowcut.is_finite() || !highcut.is_finite() || !nyquist.is_finite() || nyquist <= 0.0 {
        return Err(QrsError::InvalidFilterSpec(format!(
            "non-finite or non-positive frequency (lowcut {}, highcut {}, fs {})",
            lowcut, highcut, signal_frequency
        )));
    }
    if lowcut >= highcut {
        return Err(QrsError::InvalidFilterSpec(format!(
            "lowcut {} Hz must be below highcut {} Hz",
            lowcut, highcut
        )));
    }
    if lowcut < 0.0 {
        return Err(QrsError::InvalidFilterSpec(format!(
            "lowcut {} Hz must not be negative",
            lowcut
        )));
    }
    if highcut >= nyquist {
        return Err(QrsError::InvalidFilterSpec(format!(
            "highcut {} Hz must be below Nyquist frequency {} Hz",
            highcut, nyquist
        )));
    }

    Ok(())
}

/// Causal Butterworth band-pass filter for ECG conditioning
///
/// Cutoffs are normalized by the Nyquist frequency before design. The
/// filter runs forward only (direct form II transposed), so its output
/// carries the usual IIR phase lag; the detector thresholds are tuned
/// against that lag.
///
/// With `lowcut == 0.0` the band-pass degenerates into a low-pass at
/// `highcut`, which is what gets designed.
pub struct BandpassFilter {
    filter: DirectForm2Transposed,
}

impl BandpassFilter {
    /// Create a new Butterworth band-pass filter
    ///
    /// # Arguments
    /// * `lowcut` - Lower cutoff in Hz (0.0 for low-pass)
    /// * `highcut` - Upper cutoff in Hz
    /// * `signal_frequency` - Sampling frequency in Hz
    /// * `order` - Butterworth order (at least 1)
    ///
    /// # Errors
    /// `QrsError::InvalidFilterSpec` for rejected parameters,
    /// `QrsError::FilterDesign` if coefficient design fails.
    pub fn new(lowcut: f64, highcut: f64, signal_frequency: f64, order: usize) -> Result<Self> {
        check_filter_spec(lowcut, highcut, signal_frequency, order)?;

        let nyquist = 0.5 * signal_frequency;
        let low = lowcut / nyquist;
        let high = highcut / nyquist;

        let filter_type = if low == 0.0 {
            FilterType::LowPass(high)
        } else {
            FilterType::BandPass(low, high)
        };

        let zpk = butter(order as u32, filter_type, NORMALIZED_SAMPLE_RATE)
            .map_err(|e| QrsError::FilterDesign(format!("{:?}", e)))?;

        // Convert to second-order sections
        let sos = zpk2sos(&zpk, None).map_err(|e| QrsError::FilterDesign(format!("{:?}", e)))?;

        Ok(Self {
            filter: DirectForm2Transposed::new(&sos),
        })
    }

    /// Filter single sample
    pub fn process(&mut self, sample: f64) -> f64 {
        self.filter.filter(sample)
    }

    /// Filter entire buffer in-place
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Band-pass filter a whole signal with a freshly designed filter
///
/// Returns a sequence of the same length as `data`.
pub fn bandpass_filter(
    data: &[f64],
    lowcut: f64,
    highcut: f64,
    signal_frequency: f64,
    order: usize,
) -> Result<Vec<f64>> {
    let mut filter = BandpassFilter::new(lowcut, highcut, signal_frequency, order)?;
    let mut output = data.to_vec();
    filter.process_buffer(&mut output);
    Ok(output)
}
