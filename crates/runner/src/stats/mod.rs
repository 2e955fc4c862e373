//! Estimators applied to the per-tick series of a realization
//!
//! - **pdf**: histogram density, re-binned on a linear or log10 grid
//! - **psd**: averaged periodogram, re-binned on a log10 frequency grid

mod pdf;
mod psd;

pub use pdf::process_pdf;
pub use psd::{fft_power, process_psd};

/// Sample mean; zero for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean-centred sample standard deviation with an `n - 1` denominator
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
