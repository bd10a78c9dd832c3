//!
//! Log-likelihood of the observations for one factor, `lnAo[f][:, tt]`
//!
//! The likelihood `A[g][o, s_0, .., s_{F-1}]` couples all factors, so the
//! contribution to factor `f` is obtained by contracting every other factor
//! axis with the current belief of that factor at the same time step.
//!
use crate::error::Result;
use crate::model::Model;
use crate::prob::stable_log;
use crate::sample::history::ObservationTrajectory;
use crate::tensor::marginalize_except;
use ndarray::prelude::*;

///
/// Where the log is taken relative to the contraction
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    ///
    /// `E_q[log A]`: contract the log likelihood (VMP)
    ///
    ExpectedLog,
    ///
    /// `log E_q[A]`: contract the raw likelihood then take the log (BP)
    ///
    LogExpected,
}

impl Model {
    ///
    /// Compute `lnAo[:, tt]` (`Ns[f] x T`) of factor `f` for all `tt`, given the
    /// current beliefs of all factors.
    ///
    /// Observations at `tt > t` are not revealed yet and contribute zero.
    ///
    pub fn log_likelihood(
        &self,
        observations: &ObservationTrajectory,
        beliefs: &[Array2<f64>],
        f: usize,
        t: usize,
        evidence: Evidence,
    ) -> Result<Array2<f64>> {
        let n_steps = self.n_steps();
        let mut ln_ao = Array2::zeros((self.factor(f).n_states(), n_steps));

        for tt in 0..n_steps.min(t + 1) {
            let qs: Vec<ArrayView1<f64>> = beliefs.iter().map(|q| q.column(tt)).collect();
            let mut column = ln_ao.column_mut(tt);
            for (g, modality) in self.modalities().iter().enumerate() {
                let a = modality.observed(observations.outcome(g, tt));
                let l = match evidence {
                    Evidence::ExpectedLog => marginalize_except(&a.mapv(stable_log), &qs, f)?,
                    Evidence::LogExpected => marginalize_except(&a, &qs, f)?.mapv(stable_log),
                };
                column += &l;
            }
        }
        Ok(ln_ao)
    }
}
