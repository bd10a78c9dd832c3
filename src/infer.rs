//!
//! Approximate posterior inference from sequentially revealed observations
//!
//! # Schedule
//!
//! Both engines share three nested loops without any convergence check:
//!
//! ```text
//! for t in 0..T            (outer: observations o[:, 0..=t] are revealed)
//!   for i in 0..Ni         (inner: coordinate ascent sweeps)
//!     for f in 0..F        (factors, updated in place)
//!       for tt in 0..T     (belief of factor f at time tt)
//!         v  = log Qs[f][:, tt]
//!         v += (prior + future + lnAo[:, tt] - v) / tau
//!         Qs[f][:, tt] = softmax(v)
//! ```
//!
//! A factor sees the beliefs of the factors already updated in the same sweep.
//!
//! * VMP (`vmp`): prior/future terms come from the neighboring beliefs.
//! * BP (`bp`): prior/future terms come from forward/backward messages.
//!
pub mod bp;
pub mod evidence;
pub mod params;
pub mod result;
pub mod trace;
pub mod vmp;

pub use params::InferParams;
pub use result::{BpOutput, Posterior, VmpOutput};
pub use trace::Trace;

use crate::prob::{softmax, stable_log_vec};
use ndarray::prelude::*;

///
/// `Ns[f] x T` matrices filled with the uniform distribution
///
fn uniform_beliefs(n_states: &[usize], n_steps: usize) -> Vec<Array2<f64>> {
    n_states
        .iter()
        .map(|&n| Array2::from_elem((n, n_steps), 1.0 / n as f64))
        .collect()
}

///
/// Move the log belief `1/tau` of the way toward `target` and renormalize.
///
/// ```text
/// v = log Qs
/// v = v + (target - v) / tau
/// return softmax(v)
/// ```
///
fn damped_update(belief: ArrayView1<f64>, target: &Array1<f64>, tau: f64) -> Array1<f64> {
    let v = stable_log_vec(&belief);
    let v = &v + &((target - &v) / tau);
    softmax(&v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob::{is_distribution, stable_log};

    #[test]
    fn infer_uniform_beliefs() {
        let qs = uniform_beliefs(&[2, 3], 4);
        assert_eq!(qs[0].dim(), (2, 4));
        assert_eq!(qs[1].dim(), (3, 4));
        assert_abs_diff_eq!(qs[1][[2, 3]], 1.0 / 3.0, epsilon = 1e-12);
    }
    #[test]
    fn infer_damped_update() {
        let q = array![0.5, 0.5];
        let target = array![0.0, -8.0];

        // tau=1 jumps to the target
        let r = damped_update(q.view(), &target, 1.0);
        assert_abs_diff_eq!(r, softmax(&target), epsilon = 1e-12);

        // tau=4 moves a quarter of the way in log space
        let r = damped_update(q.view(), &target, 4.0);
        assert!(is_distribution(&r, 1e-9));
        assert_abs_diff_eq!(
            stable_log(r[0]) - stable_log(r[1]),
            2.0,
            epsilon = 1e-5
        );
    }
}
