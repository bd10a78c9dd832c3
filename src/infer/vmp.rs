//!
//! Gradient-damped variational message passing
//!
//! ```text
//! prior[tt]  = log D[f]                   (tt = 0)
//!              log B[f] Qs[f][:, tt-1]    (tt > 0)
//! future[tt] = log B[f]^T Qs[f][:, tt+1]  (tt < T-1)
//!              0                          (tt = T-1)
//! lnAo[tt]   = \sum_g E_{Qs[f'], f' != f}[ log A[g][o[g][tt], ..] ]
//! ```
//!
use super::evidence::Evidence;
use super::params::InferParams;
use super::result::VmpOutput;
use super::trace::Trace;
use super::{damped_update, uniform_beliefs};
use crate::error::Result;
use crate::model::Model;
use crate::prob::stable_log_vec;
use crate::sample::history::ObservationTrajectory;
use log::{debug, info};
use ndarray::prelude::*;

impl Model {
    ///
    /// Run VMP on the observations and return the final beliefs `Qs`
    /// (and the trace `Xq` if `params.record_trace`).
    ///
    pub fn run_vmp(
        &self,
        observations: &ObservationTrajectory,
        params: &InferParams,
    ) -> Result<VmpOutput> {
        params.validate()?;
        self.check_observations(observations)?;
        info!("vmp: started {}", params);

        let n_steps = self.n_steps();
        let n_states = self.n_states();
        let mut qs = uniform_beliefs(&n_states, n_steps);
        let mut trace = if params.record_trace {
            Some(Trace::new(&n_states, n_steps, params.n_iter))
        } else {
            None
        };

        for t in 0..n_steps {
            for i in 0..params.n_iter {
                for f in 0..self.n_factors() {
                    let ln_ao =
                        self.log_likelihood(observations, &qs, f, t, Evidence::ExpectedLog)?;
                    let factor = self.factor(f);
                    let b = factor.transition();

                    for tt in 0..n_steps {
                        let q = &qs[f];
                        let prior = if tt == 0 {
                            stable_log_vec(factor.prior())
                        } else {
                            stable_log_vec(&b.dot(&q.column(tt - 1)))
                        };
                        let future = if tt + 1 < n_steps {
                            stable_log_vec(&b.t().dot(&q.column(tt + 1)))
                        } else {
                            Array1::zeros(n_states[f])
                        };
                        let target = &prior + &future + &ln_ao.column(tt);
                        let updated = damped_update(q.column(tt), &target, params.tau);

                        if let Some(trace) = trace.as_mut() {
                            trace.record(f, tt, t, i, updated.view());
                        }
                        qs[f].column_mut(tt).assign(&updated);
                    }
                }
            }
            debug!(
                "vmp: t={} Qs[:, t]={:?}",
                t,
                qs.iter().map(|q| q.column(t).to_vec()).collect::<Vec<_>>()
            );
        }

        info!("vmp: finished");
        Ok(VmpOutput { beliefs: qs, trace })
    }
}

#[cfg(test)]
mod tests {
    use crate::infer::{InferParams, Posterior};
    use crate::model::mocks::*;
    use crate::prob::is_distribution;
    use crate::sample::history::ObservationTrajectory;
    use ndarray::prelude::*;

    #[test]
    fn vmp_noiseless_identity_model() {
        let model = mock_identity(5);
        let obs = ObservationTrajectory(vec![vec![0; 5]]);
        let o = model.run_vmp(&obs, &InferParams::default()).unwrap();
        for column in o.beliefs()[0].columns() {
            assert_abs_diff_eq!(column, array![1.0, 0.0], epsilon = 1e-3);
        }
        assert_eq!(o.map_states().row(0), &[0, 0, 0, 0, 0]);
    }
    #[test]
    fn vmp_beliefs_are_distributions() {
        let model = mock_random(&[2, 3, 4], &[3, 2], 6, 7);
        let h = model.generate_from_seed(7).unwrap();
        let o = model.run_vmp(&h.observations, &InferParams::default()).unwrap();
        for (q, &n) in o.beliefs().iter().zip(model.n_states().iter()) {
            assert_eq!(q.dim(), (n, 6));
            for column in q.columns() {
                assert!(is_distribution(&column, 1e-9));
            }
        }
        // every recorded update is a distribution too
        let trace = o.trace().unwrap();
        for f in 0..3 {
            for t in 0..6 {
                for i in 0..16 {
                    for column in trace.snapshot(f, t, i).columns() {
                        assert!(is_distribution(&column, 1e-9));
                    }
                }
            }
        }
    }
    #[test]
    fn vmp_trace_ends_with_final_beliefs() {
        let model = mock_two_factor(8);
        let h = model.generate_from_seed(2).unwrap();
        let params = InferParams::new(4.0, 5);
        let o = model.run_vmp(&h.observations, &params).unwrap();
        let trace = o.trace().unwrap();
        assert_eq!(trace.factor(0).dim(), (3, 8, 8, 5));
        for f in 0..2 {
            assert_eq!(trace.snapshot(f, 7, 4), o.beliefs()[f].view());
        }

        // without trace, the beliefs are the same
        let o2 = model
            .run_vmp(&h.observations, &params.without_trace())
            .unwrap();
        assert!(o2.trace().is_none());
        assert_eq!(o.beliefs(), o2.beliefs());
    }
    #[test]
    fn vmp_does_not_see_unrevealed_observations() {
        let model = mock_two_factor(6);
        let h = model.generate_from_seed(3).unwrap();
        let mut obs2 = h.observations.clone();
        obs2.0[0][2] = (obs2.0[0][2] + 1) % 3;

        let params = InferParams::new(4.0, 4);
        let o1 = model.run_vmp(&h.observations, &params).unwrap();
        let o2 = model.run_vmp(&obs2, &params).unwrap();
        let (t1, t2) = (o1.trace().unwrap(), o2.trace().unwrap());
        for f in 0..2 {
            for t in 0..2 {
                for i in 0..4 {
                    assert_eq!(t1.snapshot(f, t, i), t2.snapshot(f, t, i));
                }
            }
            assert_ne!(t1.snapshot(f, 2, 3), t2.snapshot(f, 2, 3));
        }
    }
    #[test]
    fn vmp_is_deterministic() {
        let model = mock_two_factor(10);
        let h = model.generate_from_seed(4).unwrap();
        let o1 = model.run_vmp(&h.observations, &InferParams::default()).unwrap();
        let o2 = model.run_vmp(&h.observations, &InferParams::default()).unwrap();
        assert_eq!(o1, o2);
    }
    #[test]
    fn vmp_rejects_invalid_input() {
        let model = mock_identity(3);
        let obs = ObservationTrajectory(vec![vec![0, 0]]);
        assert!(model.run_vmp(&obs, &InferParams::default()).is_err());
        let obs = ObservationTrajectory(vec![vec![0, 0, 0]]);
        assert!(model.run_vmp(&obs, &InferParams::new(0.0, 16)).is_err());
    }
}
