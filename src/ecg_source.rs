//! Loading ECG recordings from delimited text.
//!
//! The expected layout is one header line followed by one sample per line,
//! timestamp in the first column and amplitude in the second:
//!
//! ```text
//! timestamp,ecg_measurement
//! 1488794042.123,0.512
//! 1488794042.127,0.498
//! ```
//!
//! Further columns are ignored and blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{QrsError, Result};

/// One acquisition tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawSample {
    pub timestamp: f64,
    pub amplitude: f64,
}

/// A complete, immutable ECG recording
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcgRecording {
    samples: Vec<RawSample>,
}

impl EcgRecording {
    pub fn new(samples: Vec<RawSample>) -> Self {
        Self { samples }
    }

    /// Build a recording from amplitudes alone, timestamping each sample
    /// with its offset in seconds
    pub fn from_amplitudes(amplitudes: &[f64], signal_frequency: f64) -> Self {
        let samples = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| RawSample {
                timestamp: i as f64 / signal_frequency,
                amplitude,
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }
}

/// Anything that can produce a complete recording
pub trait EcgSource {
    fn read_recording(&mut self) -> Result<EcgRecording>;
}

/// Delimited text source, one header line skipped by default
pub struct CsvSource<R: BufRead> {
    reader: R,
    delimiter: char,
    header_lines: usize,
}

impl CsvSource<BufReader<File>> {
    /// Open a CSV file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CsvSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            delimiter: ',',
            header_lines: 1,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    fn parse_line(&self, line: &str, line_number: usize) -> Result<RawSample> {
        let mut fields = line.split(self.delimiter).map(str::trim);

        let mut next_field = |name: &str| -> Result<f64> {
            let field = fields.next().ok_or_else(|| QrsError::Parse {
                line: line_number,
                message: format!("missing {} column", name),
            })?;
            field.parse().map_err(|_| QrsError::Parse {
                line: line_number,
                message: format!("invalid {} value {:?}", name, field),
            })
        };

        let timestamp = next_field("timestamp")?;
        let amplitude = next_field("amplitude")?;

        Ok(RawSample {
            timestamp,
            amplitude,
        })
    }
}

impl<R: BufRead> EcgSource for CsvSource<R> {
    fn read_recording(&mut self) -> Result<EcgRecording> {
        let mut samples = Vec::new();
        let mut line = String::new();
        let mut line_number = 0;

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            if line_number <= self.header_lines || line.trim().is_empty() {
                continue;
            }
            samples.push(self.parse_line(line.trim_end(), line_number)?);
        }

        log::debug!("loaded {} samples from {} lines", samples.len(), line_number);
        Ok(EcgRecording::new(samples))
    }
}
