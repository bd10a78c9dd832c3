//!
//! Outputs of VMP/BP
//!
//! * `VmpOutput`: beliefs (and trace)
//! * `BpOutput`: beliefs, forward/backward messages (and trace)
//!
//! Both implement `Posterior`, which provides summaries against the true states.
//!
use super::trace::Trace;
use crate::sample::history::StateTrajectory;
use itertools::Itertools;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

///
/// Trait that generalizes VmpOutput and BpOutput
///
pub trait Posterior {
    ///
    /// `Qs[f]`: `Ns[f] x T` matrix whose column `t` is the belief at time `t`
    ///
    fn beliefs(&self) -> &[Array2<f64>];
    ///
    /// Trace tensors, if recorded
    ///
    fn trace(&self) -> Option<&Trace>;
    ///
    /// The most probable state of each factor at each time
    ///
    fn map_states(&self) -> StateTrajectory {
        StateTrajectory(
            self.beliefs()
                .iter()
                .map(|q| {
                    q.columns()
                        .into_iter()
                        .map(|column| {
                            column
                                .iter()
                                .position_max_by(|a, b| a.total_cmp(b))
                                .unwrap_or(0)
                        })
                        .collect()
                })
                .collect(),
        )
    }
    ///
    /// `Qs[f][s[f][t], t]`: the posterior mass put on the true state
    ///
    fn true_state_posterior(&self, states: &StateTrajectory) -> Vec<Vec<f64>> {
        self.beliefs()
            .iter()
            .zip(states.0.iter())
            .map(|(q, row)| row.iter().enumerate().map(|(t, &s)| q[[s, t]]).collect())
            .collect()
    }
    ///
    /// Average of `true_state_posterior` over factors and time steps
    ///
    fn mean_true_state_posterior(&self, states: &StateTrajectory) -> f64 {
        let p = self.true_state_posterior(states);
        let n: usize = p.iter().map(|row| row.len()).sum();
        p.iter().flatten().sum::<f64>() / n as f64
    }
    ///
    /// `mean_true_state_posterior` of the uniform beliefs, i.e. average of `1/Ns[f]`
    ///
    fn uniform_baseline(&self) -> f64 {
        let n_steps: Vec<usize> = self.beliefs().iter().map(|q| q.ncols()).collect();
        let n: usize = n_steps.iter().sum();
        self.beliefs()
            .iter()
            .zip(n_steps.iter())
            .map(|(q, &t)| t as f64 / q.nrows() as f64)
            .sum::<f64>()
            / n as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmpOutput {
    pub beliefs: Vec<Array2<f64>>,
    pub trace: Option<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpOutput {
    pub beliefs: Vec<Array2<f64>>,
    ///
    /// `Mf[f]`: evidence from the past
    ///
    pub forward: Vec<Array2<f64>>,
    ///
    /// `Mb[f]`: evidence from the future
    ///
    pub backward: Vec<Array2<f64>>,
    pub trace: Option<Trace>,
}

impl Posterior for VmpOutput {
    fn beliefs(&self) -> &[Array2<f64>] {
        &self.beliefs
    }
    fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}

impl Posterior for BpOutput {
    fn beliefs(&self) -> &[Array2<f64>] {
        &self.beliefs
    }
    fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}
