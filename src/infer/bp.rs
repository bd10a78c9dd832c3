//!
//! Gradient-damped belief propagation with explicit forward/backward messages
//!
//! The marginal `Qs[f][:, tt]` is decomposed into a forward message `Mf`
//! (evidence from the past), the local likelihood and a backward message `Mb`
//! (evidence from the future). Messages are extracted from the marginals by
//! dividing out the other terms:
//!
//! ```text
//! Mf[:, ttt] ∝ Qs[:, ttt] / (Mb[:, ttt] Ao[ttt])     (0 < ttt)
//! Mb[:, ttt] ∝ Qs[:, ttt] / (Mf[:, ttt] Ao[ttt])
//! ```
//!
//! and the marginals are then updated with the same damped step as VMP, but
//! with the messages in place of the neighboring beliefs:
//!
//! ```text
//! prior[tt]  = log D[f]                   (tt = 0)
//!              log B[f] Mf[f][:, tt-1]    (tt > 0)
//! future[tt] = log B[f]^T Mb[f][:, tt+1]  (tt < T-1)
//!              0                          (tt = T-1, no evidence from the future)
//! lnAo[tt]   = \sum_g log E_{Qs[f'], f' != f}[ A[g][o[g][tt], ..] ]
//! ```
//!
use super::evidence::Evidence;
use super::params::InferParams;
use super::result::BpOutput;
use super::trace::Trace;
use super::{damped_update, uniform_beliefs};
use crate::error::Result;
use crate::model::Model;
use crate::prob::{softmax, stable_log_vec};
use crate::sample::history::ObservationTrajectory;
use log::{debug, info};
use ndarray::prelude::*;

///
/// `softmax(log Qs - log M - lnAo)`: the message left after removing
/// the other message and the local evidence from the marginal.
///
fn extract_message(
    marginal: ArrayView1<f64>,
    other: ArrayView1<f64>,
    ln_ao: ArrayView1<f64>,
) -> Array1<f64> {
    let v = stable_log_vec(&marginal) - stable_log_vec(&other) - &ln_ao;
    softmax(&v)
}

impl Model {
    ///
    /// Run BP on the observations and return the final beliefs `Qs`, the
    /// messages `Mf`, `Mb` (and the trace `Xq` if `params.record_trace`).
    ///
    pub fn run_bp(
        &self,
        observations: &ObservationTrajectory,
        params: &InferParams,
    ) -> Result<BpOutput> {
        params.validate()?;
        self.check_observations(observations)?;
        info!("bp: started {}", params);

        let n_steps = self.n_steps();
        let n_states = self.n_states();
        let mut qs = uniform_beliefs(&n_states, n_steps);
        let mut mf = uniform_beliefs(&n_states, n_steps);
        let mut mb = uniform_beliefs(&n_states, n_steps);
        for (f, factor) in self.factors().iter().enumerate() {
            mf[f].column_mut(0).assign(factor.prior());
        }
        let mut trace = if params.record_trace {
            Some(Trace::new(&n_states, n_steps, params.n_iter))
        } else {
            None
        };

        for t in 0..n_steps {
            for i in 0..params.n_iter {
                for f in 0..self.n_factors() {
                    let ln_ao =
                        self.log_likelihood(observations, &qs, f, t, Evidence::LogExpected)?;
                    let factor = self.factor(f);
                    let b = factor.transition();

                    for tt in 0..n_steps {
                        // messages of the revealed steps, except for the last step
                        for ttt in 0..(t + 1).min(n_steps - 1) {
                            if ttt > 0 {
                                let m = extract_message(
                                    qs[f].column(ttt),
                                    mb[f].column(ttt),
                                    ln_ao.column(ttt),
                                );
                                mf[f].column_mut(ttt).assign(&m);
                            }
                            let m = extract_message(
                                qs[f].column(ttt),
                                mf[f].column(ttt),
                                ln_ao.column(ttt),
                            );
                            mb[f].column_mut(ttt).assign(&m);
                        }

                        let prior = if tt == 0 {
                            stable_log_vec(factor.prior())
                        } else {
                            stable_log_vec(&b.dot(&mf[f].column(tt - 1)))
                        };
                        let future = if tt + 1 < n_steps {
                            stable_log_vec(&b.t().dot(&mb[f].column(tt + 1)))
                        } else {
                            Array1::zeros(n_states[f])
                        };
                        let target = &prior + &future + &ln_ao.column(tt);
                        let updated = damped_update(qs[f].column(tt), &target, params.tau);

                        if let Some(trace) = trace.as_mut() {
                            trace.record(f, tt, t, i, updated.view());
                        }
                        qs[f].column_mut(tt).assign(&updated);
                    }
                }
            }
            debug!(
                "bp: t={} Qs[:, t]={:?}",
                t,
                qs.iter().map(|q| q.column(t).to_vec()).collect::<Vec<_>>()
            );
        }

        info!("bp: finished");
        Ok(BpOutput {
            beliefs: qs,
            forward: mf,
            backward: mb,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{InferParams, Posterior};
    use crate::model::mocks::*;
    use crate::prob::is_distribution;

    #[test]
    fn bp_extract_message() {
        // removing uniform message and zero evidence keeps the marginal
        let q = array![0.2, 0.8];
        let m = extract_message(q.view(), array![0.5, 0.5].view(), array![0.0, 0.0].view());
        assert_abs_diff_eq!(m, q, epsilon = 1e-6);

        // dividing out the evidence
        let ln_ao = array![0.0, (4.0f64).ln()];
        let m = extract_message(q.view(), array![0.5, 0.5].view(), ln_ao.view());
        assert_abs_diff_eq!(m, array![0.5, 0.5], epsilon = 1e-6);
    }
    #[test]
    fn bp_beliefs_and_messages_are_distributions() {
        let model = mock_random(&[3, 2], &[2, 4], 7, 5);
        let h = model.generate_from_seed(5).unwrap();
        let o = model.run_bp(&h.observations, &InferParams::default()).unwrap();
        for f in 0..2 {
            let n = model.n_states()[f];
            for x in [&o.beliefs[f], &o.forward[f], &o.backward[f]] {
                assert_eq!(x.dim(), (n, 7));
                for column in x.columns() {
                    assert!(is_distribution(&column, 1e-9));
                }
            }
        }
    }
    #[test]
    fn bp_every_update_is_a_distribution() {
        let model = mock_random(&[2, 3, 4], &[3, 2], 5, 13);
        let h = model.generate_from_seed(13).unwrap();
        let params = InferParams::new(4.0, 6);
        let o = model.run_bp(&h.observations, &params).unwrap();
        let trace = o.trace().unwrap();
        for f in 0..3 {
            for t in 0..5 {
                for i in 0..6 {
                    for column in trace.snapshot(f, t, i).columns() {
                        assert!(is_distribution(&column, 1e-9));
                    }
                }
            }
        }
    }
    #[test]
    fn bp_forward_message_starts_from_prior() {
        let model = mock_two_factor(6);
        let h = model.generate_from_seed(0).unwrap();
        let o = model.run_bp(&h.observations, &InferParams::default()).unwrap();
        for f in 0..2 {
            assert_eq!(o.forward[f].column(0), model.factor(f).prior().view());
        }
        // the last step has no message update
        for f in 0..2 {
            assert_abs_diff_eq!(
                o.backward[f].column(5),
                Array1::from_elem(3, 1.0 / 3.0),
                epsilon = 1e-12
            );
        }
    }
    #[test]
    fn bp_horizon_with_different_cardinalities() {
        // the last step uses a flat future term sized to each factor
        for n_steps in 1..4 {
            let model = mock_random(&[2, 5], &[3], n_steps, 9);
            let h = model.generate_from_seed(1).unwrap();
            let o = model
                .run_bp(&h.observations, &InferParams::new(4.0, 3))
                .unwrap();
            assert_eq!(o.beliefs[0].dim(), (2, n_steps));
            assert_eq!(o.beliefs[1].dim(), (5, n_steps));
            for q in o.beliefs() {
                assert!(is_distribution(&q.column(n_steps - 1), 1e-9));
            }
        }
    }
    #[test]
    fn bp_single_step_is_local_update() {
        // T=1: no messages; the belief moves toward prior + likelihood
        let model = mock_identity(1);
        let obs = ObservationTrajectory(vec![vec![0]]);
        let o = model.run_bp(&obs, &InferParams::default()).unwrap();
        assert!(o.beliefs[0][[0, 0]] > 0.999);
        let obs = ObservationTrajectory(vec![vec![1]]);
        let o = model.run_bp(&obs, &InferParams::default()).unwrap();
        // prior and evidence disagree with equal strength
        assert_abs_diff_eq!(o.beliefs[0][[0, 0]], 0.5, epsilon = 1e-6);
    }
    #[test]
    fn bp_is_deterministic_and_trace_matches() {
        let model = mock_two_factor(5);
        let h = model.generate_from_seed(8).unwrap();
        let params = InferParams::new(4.0, 6);
        let o1 = model.run_bp(&h.observations, &params).unwrap();
        let o2 = model.run_bp(&h.observations, &params).unwrap();
        assert_eq!(o1, o2);
        let trace = o1.trace().unwrap();
        for f in 0..2 {
            assert_eq!(trace.snapshot(f, 4, 5), o1.beliefs[f].view());
        }
    }
}
