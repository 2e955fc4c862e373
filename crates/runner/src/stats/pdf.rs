//! Probability density estimate
//!
//! A fine histogram with `100 * out_points` bins is built first and then
//! merged into `out_points` output bins. On the log grid the output is
//! `(log10 x, log10 density)` and bins without mass are dropped.

const REFINEMENT: usize = 100;

fn histogram_step(llim: f64, rlim: f64, steps: usize) -> f64 {
    (rlim - llim) / (steps as f64 - 1.0)
}

/// Fine histogram over `[llim, rlim]`, normalised by the in-range samples
fn histogram(values: &[f64], llim: f64, rlim: f64, step: f64, steps: usize) -> Vec<f64> {
    let mut mass = vec![0.0; steps];
    let mut samples = 0usize;

    for &x in values {
        if llim <= x && x <= rlim {
            let bin = (((x - llim) / step) as usize).min(steps - 1);
            mass[bin] += 1.0;
            samples += 1;
        }
    }

    if samples > 0 {
        let n = samples as f64;
        mass.iter_mut().for_each(|m| *m /= n);
    }
    mass
}

/// Estimate the density of `values` on `[llim, rlim]`
///
/// Returns `(x, density)` pairs: bin centres and mass per unit width on the
/// linear grid, their log10 on the log grid. The log grid needs `llim > 0`;
/// otherwise, and for a degenerate interval, the result is empty.
pub fn process_pdf(
    values: &[f64],
    log_bins: bool,
    llim: f64,
    rlim: f64,
    out_points: usize,
) -> Vec<[f64; 2]> {
    if out_points < 2 || !(llim < rlim) || !llim.is_finite() || !rlim.is_finite() {
        return Vec::new();
    }

    let steps = REFINEMENT * out_points;
    let step = histogram_step(llim, rlim, steps);
    let fine = histogram(values, llim, rlim, step, steps);

    if log_bins {
        rebin_log(&fine, llim, rlim, step, out_points)
    } else {
        rebin_linear(&fine, llim, rlim, step, out_points)
    }
}

fn rebin_linear(fine: &[f64], llim: f64, rlim: f64, step: f64, out_points: usize) -> Vec<[f64; 2]> {
    let width = histogram_step(llim, rlim, out_points);
    let mut edge = llim;
    let mut cursor = llim;
    let mut parsed = 0;

    (0..out_points)
        .map(|_| {
            edge += width;
            let mut mass = 0.0;
            while cursor < edge && parsed < fine.len() {
                cursor += step;
                mass += fine[parsed];
                parsed += 1;
            }
            [edge - 0.5 * width, mass / width]
        })
        .collect()
}

fn rebin_log(fine: &[f64], llim: f64, rlim: f64, step: f64, out_points: usize) -> Vec<[f64; 2]> {
    if llim <= 0.0 {
        return Vec::new();
    }

    let (lo, hi) = (llim.log10(), rlim.log10());
    let width = histogram_step(lo, hi, out_points);
    let mut edge = lo;
    let mut cursor = llim;
    let mut parsed = 0;
    let mut out: Vec<[f64; 2]> = Vec::with_capacity(out_points);

    while edge <= hi && out.len() < out_points {
        edge += width;
        let mut mass = 0.0;
        while cursor.log10() < edge && parsed < fine.len() {
            cursor += step;
            mass += fine[parsed];
            parsed += 1;
        }

        if mass > 0.0 {
            let centre = edge - 0.5 * width;
            // linear width back to the previous emitted centre
            let previous = out.last().map_or(centre - width, |p| p[0]);
            let linear_width = 10f64.powf(centre) - 10f64.powf(previous);
            out.push([centre, (mass / linear_width).log10()]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn evenly_spaced(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_linear_mass_sums_to_one() {
        let mut values = evenly_spaced(1000, 0.0, 1.0);
        // out of range values are ignored
        values.extend([-5.0, 3.0, 1.0001]);

        let pdf = process_pdf(&values, false, 0.0, 1.0, 20);
        let width = 1.0 / 19.0;

        assert_eq!(pdf.len(), 20);
        let total: f64 = pdf.iter().map(|p| p[1] * width).sum();
        assert_relative_eq!(total, 1.0, max_relative = 1e-9);
        assert_relative_eq!(pdf[0][0], 0.5 * width, max_relative = 1e-9);
    }

    #[test]
    fn test_linear_uniform_is_flat() {
        let values = evenly_spaced(100_000, 0.0, 1.0);
        let pdf = process_pdf(&values, false, 0.0, 1.0, 10);

        // the last output bin extends past rlim and catches only its tail
        for point in &pdf[1..8] {
            assert_relative_eq!(point[1], 1.0, max_relative = 0.05);
        }
    }

    #[test]
    fn test_log_grid_requires_positive_lower_limit() {
        let values = [1.0, 2.0, 3.0];
        assert!(process_pdf(&values, true, 0.0, 10.0, 10).is_empty());
        assert!(process_pdf(&values, true, -1.0, 10.0, 10).is_empty());
    }

    #[test]
    fn test_log_grid_skips_empty_bins() {
        let values = vec![10.0; 50];
        let pdf = process_pdf(&values, true, 1.0, 100.0, 10);

        assert_eq!(pdf.len(), 1);
        assert!(pdf[0][0] > 0.9 && pdf[0][0] < 1.2);
    }

    #[test]
    fn test_log_grid_centres_increase() {
        let values: Vec<f64> = (1..=10_000).map(|i| i as f64 / 100.0).collect();
        let pdf = process_pdf(&values, true, 0.01, 100.0, 25);

        assert!(!pdf.is_empty());
        assert!(pdf.windows(2).all(|w| w[0][0] < w[1][0]));
        assert!(pdf.iter().all(|p| p[1].is_finite()));
        // uniform density 1/100 on the dense part of the range
        let last = pdf[pdf.len() - 2];
        assert_abs_diff_eq!(last[1], -2.0, epsilon = 0.15);
    }

    #[test]
    fn test_degenerate_interval_is_empty() {
        assert!(process_pdf(&[1.0], false, 1.0, 1.0, 10).is_empty());
        assert!(process_pdf(&[1.0], false, 2.0, 1.0, 10).is_empty());
    }
}
