use crate::ecg_source::EcgRecording;

/// Shape of one synthetic heartbeat: a narrow R wave followed by a broad T wave
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct BeatShape {
    pub r_amplitude: f64,
    /// Gaussian standard deviation of the R wave in seconds
    pub r_width_secs: f64,
    pub t_amplitude: f64,
    pub t_width_secs: f64,
    /// Delay of the T wave peak after the R wave peak
    pub t_delay_secs: f64,
}

impl Default for BeatShape {
    fn default() -> Self {
        Self {
            r_amplitude: 5.0,
            r_width_secs: 0.01,
            t_amplitude: 1.0,
            t_width_secs: 0.04,
            t_delay_secs: 0.25,
        }
    }
}

/// Regular synthetic ECG with a fixed heart rate
#[derive(Debug, Clone)]
pub struct SyntheticEcg {
    pub signal_frequency: f64,
    pub duration_secs: f64,
    pub heart_rate_bpm: f64,
    /// Time of the first R wave peak
    pub first_beat_secs: f64,
    pub beat: BeatShape,
}

impl SyntheticEcg {
    pub fn new(signal_frequency: f64, duration_secs: f64, heart_rate_bpm: f64) -> Self {
        Self {
            signal_frequency,
            duration_secs,
            heart_rate_bpm,
            first_beat_secs: 0.5,
            beat: BeatShape::default(),
        }
    }

    /// R wave peak times in seconds; beats whose T wave would fall past the
    /// end of the recording are left out
    pub fn beat_times(&self) -> Vec<f64> {
        let period = 60.0 / self.heart_rate_bpm;
        (0..)
            .map(|k| self.first_beat_secs + k as f64 * period)
            .take_while(|t| t + self.beat.t_delay_secs < self.duration_secs)
            .collect()
    }

    /// R wave peak positions in samples
    pub fn beat_positions(&self) -> Vec<usize> {
        self.beat_times()
            .iter()
            .map(|t| (t * self.signal_frequency).round() as usize)
            .collect()
    }

    pub fn generate(&self) -> Vec<f64> {
        let num_samples = (self.duration_secs * self.signal_frequency) as usize;
        let mut signal = vec![0.0; num_samples];

        for t in self.beat_times() {
            add_gaussian_bump(
                &mut signal,
                self.signal_frequency,
                t,
                self.beat.r_amplitude,
                self.beat.r_width_secs,
            );
            add_gaussian_bump(
                &mut signal,
                self.signal_frequency,
                t + self.beat.t_delay_secs,
                self.beat.t_amplitude,
                self.beat.t_width_secs,
            );
        }

        signal
    }

    pub fn generate_recording(&self) -> EcgRecording {
        EcgRecording::from_amplitudes(&self.generate(), self.signal_frequency)
    }
}

/// Add a Gaussian bump centred at `center_secs`, evaluated within six widths
pub fn add_gaussian_bump(
    signal: &mut [f64],
    signal_frequency: f64,
    center_secs: f64,
    amplitude: f64,
    width_secs: f64,
) {
    let center = center_secs * signal_frequency;
    let width = width_secs * signal_frequency;
    let start = (center - 6.0 * width).floor().max(0.0) as usize;
    let end = ((center + 6.0 * width).ceil().max(0.0) as usize).min(signal.len());

    for i in start..end {
        let z = (i as f64 - center) / width;
        signal[i] += amplitude * (-0.5 * z * z).exp();
    }
}

/// Rectangular pulses of `width` samples starting at each position
pub fn pulse_train(len: usize, positions: &[usize], amplitude: f64, width: usize) -> Vec<f64> {
    let mut signal = vec![0.0; len];
    for &p in positions {
        let end = (p + width).min(len);
        for sample in signal[p.min(len)..end].iter_mut() {
            *sample = amplitude;
        }
    }
    signal
}
