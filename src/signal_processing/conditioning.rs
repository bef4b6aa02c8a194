//! Derivative, squaring and moving-window integration stages.
//!
//! Each stage takes the previous stage's complete output and returns a new
//! sequence. Length changes are part of the contract: differentiation drops
//! one sample, integration with a window of `W` adds `W - 1`.

/// First discrete difference, `out[i] = data[i + 1] - data[i]`
///
/// Returns `data.len() - 1` samples (empty for fewer than two samples).
pub fn differentiate(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Element-wise square
pub fn square(data: &[f64]) -> Vec<f64> {
    data.iter().map(|x| x * x).collect()
}

/// Moving-window integration as a full convolution with `window` ones
///
/// Output sample `n` is the sum of `data[n + 1 - window ..= n]`, clipped to
/// the valid range, for `n` in `0 .. data.len() + window - 1`. Every window
/// is summed directly so stretches of exact zeros stay exactly zero.
pub fn integrate(data: &[f64], window: usize) -> Vec<f64> {
    if data.is_empty() || window == 0 {
        return Vec::new();
    }

    let out_len = data.len() + window - 1;
    (0..out_len)
        .map(|n| {
            let start = (n + 1).saturating_sub(window);
            let end = n.min(data.len() - 1);
            data[start..=end].iter().sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_differentiate() {
        let d = differentiate(&[1.0, 4.0, 2.0, 2.0, 7.0]);
        assert_eq!(d, vec![3.0, -2.0, 0.0, 5.0]);
    }

    #[test]
    fn test_differentiate_short_input() {
        assert!(differentiate(&[]).is_empty());
        assert!(differentiate(&[3.0]).is_empty());
    }

    #[test]
    fn test_square_collapses_sign() {
        assert_eq!(square(&[-3.0, 2.0, 0.0]), vec![9.0, 4.0, 0.0]);
    }

    #[test]
    fn test_integrate_full_convolution() {
        // np.convolve([1, 2, 3, 4], np.ones(3))
        let out = integrate(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out, vec![1.0, 3.0, 6.0, 9.0, 7.0, 4.0]);
    }

    #[test]
    fn test_integrate_window_longer_than_input() {
        // np.convolve([1, 2], np.ones(4))
        let out = integrate(&[1.0, 2.0], 4);
        assert_eq!(out, vec![1.0, 3.0, 3.0, 3.0, 2.0]);
    }

    #[test]
    fn test_integrate_window_of_one_is_identity() {
        let data = [0.5, -1.25, 3.0];
        assert_eq!(integrate(&data, 1), data.to_vec());
    }

    #[test]
    fn test_stage_lengths() {
        let filtered: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        let differentiated = differentiate(&filtered);
        let squared = square(&differentiated);
        let integrated = integrate(&squared, 15);

        assert_eq!(differentiated.len(), filtered.len() - 1);
        assert_eq!(squared.len(), differentiated.len());
        assert_eq!(integrated.len(), squared.len() + 15 - 1);
    }

    #[test]
    fn test_integrated_zeros_stay_exact() {
        let mut data = vec![0.0; 40];
        data[5] = 0.1;
        data[6] = 0.3;
        let out = integrate(&data, 15);

        assert_relative_eq!(out[10], 0.4);
        // Window has fully passed the burst
        assert!(out[21..].iter().all(|&v| v == 0.0));
    }
}
