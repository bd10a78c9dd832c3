//!
//! Trace tensors `Xq[f][state, tt, t, i]`
//!
//! Every belief update of the engines is recorded, indexed by
//!
//! * `tt`: time step of the updated belief
//! * `t`: outer iteration (the last revealed observation)
//! * `i`: inner iteration
//!
//! This is a diagnostic record and is not used by inference itself.
//!
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    factors: Vec<Array4<f64>>,
}

impl Trace {
    ///
    /// Zero-filled trace of shape `(Ns[f], T, T, Ni)` for each factor
    ///
    pub fn new(n_states: &[usize], n_steps: usize, n_iter: usize) -> Trace {
        Trace {
            factors: n_states
                .iter()
                .map(|&n| Array4::zeros((n, n_steps, n_steps, n_iter)))
                .collect(),
        }
    }
    pub fn n_factors(&self) -> usize {
        self.factors.len()
    }
    ///
    /// `Xq[f]`
    ///
    pub fn factor(&self, f: usize) -> &Array4<f64> {
        &self.factors[f]
    }
    ///
    /// Store the belief of factor `f` at `tt` after update `(t, i)`.
    ///
    pub fn record(&mut self, f: usize, tt: usize, t: usize, i: usize, belief: ArrayView1<f64>) {
        self.factors[f].slice_mut(s![.., tt, t, i]).assign(&belief);
    }
    ///
    /// Beliefs of factor `f` over all time steps (`Ns[f] x T`) after update `(t, i)`.
    ///
    pub fn snapshot(&self, f: usize, t: usize, i: usize) -> ArrayView2<f64> {
        self.factors[f].slice(s![.., .., t, i])
    }
    ///
    /// History of the belief of factor `f` at time `tt`, as a list of vectors
    /// in the order of updates `(t, i)`.
    ///
    pub fn path(&self, f: usize, tt: usize) -> Vec<Array1<f64>> {
        let x = &self.factors[f];
        let (_, _, n_outer, n_inner) = x.dim();
        (0..n_outer)
            .flat_map(|t| (0..n_inner).map(move |i| (t, i)))
            .map(|(t, i)| x.slice(s![.., tt, t, i]).to_owned())
            .collect()
    }
}
