//!
//! probability calculation in log space
//! implements stable log and softmax
//!
use ndarray::prelude::*;

///
/// Offset added before taking log, `exp(-16)`.
///
pub const LOG_EPS: f64 = 1.1253517471925912e-7;

///
/// Tolerance used when checking that a vector sums to 1
///
pub const PROB_TOLERANCE: f64 = 1e-9;

///
/// Numerically safe logarithm `log(x + exp(-16))`
///
/// `stable_log(0) = -16` so log-space sums stay finite
/// even when some probability is exactly zero.
///
#[inline]
pub fn stable_log(x: f64) -> f64 {
    (x + LOG_EPS).ln()
}

///
/// Elementwise `stable_log` of a vector
///
pub fn stable_log_vec<S>(x: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: ndarray::Data<Elem = f64>,
{
    x.mapv(stable_log)
}

///
/// `exp(v) / sum(exp(v))`
///
/// The maximum is subtracted first to avoid overflow, which does not change the result.
///
pub fn softmax<S>(v: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: ndarray::Data<Elem = f64>,
{
    let max = v.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let e = v.mapv(|x| (x - max).exp());
    let z = e.sum();
    e / z
}

///
/// Divide by the sum.
/// A vector with zero mass is left as it is.
///
pub fn normalize<S>(v: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: ndarray::Data<Elem = f64>,
{
    let z = v.sum();
    if z > 0.0 {
        v.mapv(|x| x / z)
    } else {
        v.to_owned()
    }
}

///
/// Uniform distribution `1/n` of length `n`
///
pub fn uniform(n: usize) -> Array1<f64> {
    Array1::from_elem(n, 1.0 / n as f64)
}

///
/// Is `v` a probability distribution?
/// (every entry is finite and non-negative, and the sum is 1 within `tol`)
///
pub fn is_distribution<S>(v: &ArrayBase<S, Ix1>, tol: f64) -> bool
where
    S: ndarray::Data<Elem = f64>,
{
    v.iter().all(|&x| x.is_finite() && x >= 0.0) && (v.sum() - 1.0).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_log_of_zero_is_finite() {
        assert_relative_eq!(LOG_EPS, (-16f64).exp(), max_relative = 1e-12);
        assert_abs_diff_eq!(stable_log(0.0), -16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stable_log(1.0), 0.0, epsilon = 1e-6);
        assert!(stable_log(0.5) < 0.0);
        let v = stable_log_vec(&array![0.0, 1.0]);
        assert!(v.iter().all(|x| x.is_finite()));
    }
    #[test]
    fn softmax_is_normalized() {
        let q = softmax(&array![0.0, 0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(q, uniform(4), epsilon = 1e-12);

        // large values do not overflow
        let q = softmax(&array![1000.0, 999.0]);
        assert_abs_diff_eq!(q.sum(), 1.0, epsilon = 1e-12);
        assert!(q[0] > q[1]);

        // shift invariance
        let a = softmax(&array![1.0, 2.0, 3.0]);
        let b = softmax(&array![-4.0, -3.0, -2.0]);
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
    #[test]
    fn normalize_and_check() {
        let v = normalize(&array![1.0, 3.0]);
        assert_abs_diff_eq!(v, array![0.25, 0.75], epsilon = 1e-12);
        assert!(is_distribution(&v, PROB_TOLERANCE));
        assert!(!is_distribution(&array![0.5, 0.6], PROB_TOLERANCE));
        assert!(!is_distribution(&array![1.5, -0.5], PROB_TOLERANCE));
        assert!(!is_distribution(&array![f64::NAN, 1.0], PROB_TOLERANCE));
        // zero mass vector is kept
        assert_eq!(normalize(&array![0.0, 0.0]), array![0.0, 0.0]);
    }
}
