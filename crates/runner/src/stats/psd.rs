//! Power spectral density estimate
//!
//! The series is cut into non-overlapping slices of a power-of-two length,
//! each slice is transformed with an in-place radix-2 FFT and the one-sided
//! power `|X_k|^2` (`k < n/2`) is averaged over slices. The averaged
//! spectrum is then merged onto log10-spaced frequency bins, so the result
//! plots as a straight line on log-log axes for power-law spectra.

use crate::error::StatsError;
use std::f64::consts::PI;

/// One-sided power spectrum `|X_k|^2` for `k < n/2`
///
/// `values.len()` must be a power of two.
pub fn fft_power(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    let n = values.len();
    if !n.is_power_of_two() {
        return Err(StatsError::NotPowerOfTwo(n));
    }
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut re = values.to_vec();
    let mut im = vec![0.0; n];

    // bit-reversal permutation
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let (wr, wi) = ((PI / half as f64).cos(), -(PI / half as f64).sin());
        for start in (0..n).step_by(len) {
            let (mut ur, mut ui) = (1.0, 0.0);
            for k in start..start + half {
                let m = k + half;
                let tr = re[m] * ur - im[m] * ui;
                let ti = im[m] * ur + re[m] * ui;
                re[m] = re[k] - tr;
                im[m] = im[k] - ti;
                re[k] += tr;
                im[k] += ti;

                let t = ur;
                ur = t * wr - ui * wi;
                ui = t * wi + ui * wr;
            }
        }
        len <<= 1;
    }

    Ok(re
        .iter()
        .zip(&im)
        .take(n / 2)
        .map(|(r, i)| r * r + i * i)
        .collect())
}

/// Estimate the PSD of `values` sampled every `time_tick`
///
/// Returns `(log10 frequency, log10 power)` pairs, at most `out_points` of
/// them. When the series is shorter than `slice_size` the slice shrinks to
/// the largest power of two that fits.
pub fn process_psd(
    values: &[f64],
    time_tick: f64,
    out_points: usize,
    slice_size: usize,
) -> Result<Vec<[f64; 2]>, StatsError> {
    if values.len() < 2 || out_points < 2 {
        return Ok(Vec::new());
    }

    let slice_size = if values.len() < slice_size {
        let shrunk = 1usize << (usize::BITS - 1 - values.len().leading_zeros());
        log::warn!(
            "Series of {} points is shorter than the PSD slice {}, using {}",
            values.len(),
            slice_size,
            shrunk
        );
        shrunk
    } else {
        slice_size
    };

    let mut spectrum = vec![0.0; slice_size / 2];
    let mut slices = 0usize;
    for slice in values.chunks_exact(slice_size) {
        let power = fft_power(slice)?;
        spectrum
            .iter_mut()
            .zip(power)
            .for_each(|(acc, p)| *acc += p);
        slices += 1;
    }
    if slices == 0 {
        return Ok(Vec::new());
    }
    let n = slices as f64;
    spectrum.iter_mut().for_each(|s| *s /= n);

    Ok(rebin(&spectrum, time_tick, out_points))
}

/// Merge spectrum bins `1..len` onto `out_points` log10-spaced bins
fn rebin(spectrum: &[f64], time_tick: f64, out_points: usize) -> Vec<[f64; 2]> {
    let len = spectrum.len();
    if len < 2 {
        return Vec::new();
    }

    let normalization = (time_tick / len as f64).log10();
    let scale = (2.0 * len as f64 * time_tick).log10();
    let hi = (len as f64).log10();
    let width = hi / (out_points as f64 - 1.0);

    let mut out: Vec<[f64; 2]> = Vec::with_capacity(out_points);
    let mut edge = width;
    let mut k = 1;
    let mut previous_x = 0.0;

    while edge <= hi && out.len() < out_points {
        let mut total = 0.0;
        let mut count = 0usize;
        while k < len && (k as f64).log10() < edge {
            total += spectrum[k];
            count += 1;
            k += 1;
        }

        if total > 0.0 {
            let x = 10f64.powf(edge - scale);
            let centre = if out.is_empty() {
                x / 2.0
            } else {
                (x + previous_x) / 2.0
            };
            previous_x = x;
            out.push([centre.log10(), (total / count as f64).log10() + normalization]);
        }
        edge += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fft_rejects_non_power_of_two() {
        assert_eq!(fft_power(&[1.0; 6]), Err(StatsError::NotPowerOfTwo(6)));
        assert_eq!(fft_power(&[]), Err(StatsError::NotPowerOfTwo(0)));
    }

    #[test]
    fn test_fft_constant_has_only_dc() {
        let power = fft_power(&[1.0; 8]).unwrap();

        assert_eq!(power.len(), 4);
        assert_abs_diff_eq!(power[0], 64.0, epsilon = 1e-9);
        for p in &power[1..] {
            assert_abs_diff_eq!(*p, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fft_cosine_peak() {
        let n = 16;
        let values: Vec<f64> = (0..n)
            .map(|t| (2.0 * PI * 3.0 * t as f64 / n as f64).cos())
            .collect();
        let power = fft_power(&values).unwrap();

        assert_abs_diff_eq!(power[3], 64.0, epsilon = 1e-9);
        for (_, p) in power.iter().enumerate().filter(|(k, _)| *k != 3) {
            assert_abs_diff_eq!(*p, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_impulse_spectrum_is_flat() {
        let mut values = vec![0.0; 1024];
        values[0] = 1.0;

        let psd = process_psd(&values, 1.0, 8, 1024).unwrap();

        assert!(psd.len() >= 6);
        assert!(psd.windows(2).all(|w| w[0][0] < w[1][0]));
        // unit power in every bin, normalised by tick / len
        let expected = (1.0_f64 / 512.0).log10();
        for point in &psd {
            assert_abs_diff_eq!(point[1], expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_slices_are_averaged() {
        let mut values = vec![0.0; 2048];
        values[0] = 2.0;
        values[1024] = 2.0;

        let single = process_psd(&values[..1024], 1.0, 8, 1024).unwrap();
        let averaged = process_psd(&values, 1.0, 8, 1024).unwrap();

        assert_eq!(single.len(), averaged.len());
        for (a, b) in single.iter().zip(&averaged) {
            assert_abs_diff_eq!(a[1], b[1], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_short_series_shrinks_slice() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.37).sin()).collect();
        let psd = process_psd(&values, 1.0, 20, 131_072).unwrap();

        assert!(!psd.is_empty());
        assert!(psd.iter().all(|p| p[0].is_finite() && p[1].is_finite()));
    }

    #[test]
    fn test_degenerate_series() {
        assert!(process_psd(&[], 1.0, 10, 1024).unwrap().is_empty());
        assert!(process_psd(&[1.0], 1.0, 10, 1024).unwrap().is_empty());
    }
}
