//! Gaussian window weights.
//!
//! `w[k] = exp(-½ ((k - (W-1)/2) / σ)²)` for `k = 0..W`.
//!
//! The weights are left unnormalized: the rolling mean renormalizes over the
//! samples that are actually present in each window.

/// Build a symmetric Gaussian kernel of `length` weights with spread `std` (in samples).
pub fn gaussian_kernel(length: usize, std: f64) -> Vec<f64> {
    let center = (length as f64 - 1.0) / 2.0;
    let denom = 2.0 * std * std;
    (0..length)
        .map(|k| {
            let d = k as f64 - center;
            (-(d * d) / denom).exp()
        })
        .collect()
}
