//! Centered weighted rolling mean with a minimum-support rule.
//!
//! For output position `i` and a kernel of `W` weights the window spans
//! positions `[i + c - (W-1), i + c]` with `c = (W-1) / 2`; `weights[k]`
//! applies to position `i + c - (W-1) + k`. Odd windows are exactly centered,
//! even windows sit half a sample early.
//!
//! Positions outside the series and `NaN` samples contribute nothing. The
//! mean is renormalized over the weights that did contribute, and a position
//! with fewer than `min_support` contributing samples is `NaN`.

pub fn rolling_weighted_mean(values: &[f64], weights: &[f64], min_support: usize) -> Vec<f64> {
    let n = values.len();
    let w = weights.len();
    if w == 0 {
        return vec![f64::NAN; n];
    }

    let lead = (w - 1) / 2;
    let lag = w - 1 - lead;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        // Clip the window to the series; `k0` is the kernel index of `start`.
        let (start, k0) = if i >= lag { (i - lag, 0) } else { (0, lag - i) };
        let end = (i + lead).min(n - 1);

        let mut acc = 0.0;
        let mut weight_sum = 0.0;
        let mut support = 0usize;
        for (offset, &x) in values[start..=end].iter().enumerate() {
            if x.is_nan() {
                continue;
            }
            let wk = weights[k0 + offset];
            acc += wk * x;
            weight_sum += wk;
            support += 1;
        }

        if support >= min_support && support > 0 && weight_sum > 0.0 {
            out.push(acc / weight_sum);
        } else {
            out.push(f64::NAN);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smooth::gaussian_kernel;

    #[test]
    fn boxcar_matches_hand_computation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = rolling_weighted_mean(&values, &[1.0, 1.0, 1.0], 1);
        assert!((out[0] - 1.5).abs() < 1e-12);
        assert!((out[1] - 2.0).abs() < 1e-12);
        assert!((out[2] - 3.0).abs() < 1e-12);
        assert!((out[4] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn even_window_leans_back_half_a_sample() {
        // W=4: window for i is [i-2, i+1].
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let out = rolling_weighted_mean(&values, &[1.0; 4], 1);
        assert!((out[2] - 1.5).abs() < 1e-12);
        assert!((out[3] - 2.5).abs() < 1e-12);
        assert!((out[5] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn weights_are_renormalized_over_valid_samples() {
        let values = [2.0, f64::NAN, 4.0];
        let out = rolling_weighted_mean(&values, &[1.0, 3.0, 1.0], 2);
        // Center position: only the two unit-weight neighbours are valid.
        assert!((out[1] - 3.0).abs() < 1e-12);
        // Edges have one neighbour missing and one NaN: support 1 < 2.
        assert!(out[0].is_nan());
        assert!(out[2].is_nan());
    }

    #[test]
    fn insufficient_support_yields_nan() {
        let values = [1.0, 2.0];
        let out = rolling_weighted_mean(&values, &gaussian_kernel(5, 1.0), 3);
        assert!(out.iter().all(|v| v.is_nan()));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(rolling_weighted_mean(&[], &[1.0, 1.0, 1.0], 3).is_empty());
    }
}
