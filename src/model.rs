//!
//! Factorial hidden Markov model
//!
//! # Overview
//!
//! * hidden factors `f = 0, .., F-1`, each with `Ns[f]` states
//!     * `B[f][[next, prev]]` = P(next | prev), column-stochastic
//!     * `D[f][s]` = P(initial state is s)
//! * observation modalities `g = 0, .., G-1`, each with `No[g]` outcomes
//!     * `A[g][[o, s_0, .., s_{F-1}]]` = P(o | s_0, .., s_{F-1})
//! * `T` time steps
//!
//! The model is immutable once built and is shared read-only by the sampler and
//! the inference engines.
//!
pub mod config;
pub mod mocks;

use crate::error::{Error, Result};
use crate::prob::PROB_TOLERANCE;
use crate::sample::history::{ObservationTrajectory, StateTrajectory};
use log::debug;
use ndarray::prelude::*;

///
/// A hidden state factor with its own transition matrix and initial prior.
///
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenFactor {
    ///
    /// `B[[next, prev]]`
    ///
    transition: Array2<f64>,
    ///
    /// `D[s]`
    ///
    prior: Array1<f64>,
}

impl HiddenFactor {
    pub fn new(transition: Array2<f64>, prior: Array1<f64>) -> HiddenFactor {
        HiddenFactor { transition, prior }
    }
    ///
    /// cardinality `Ns[f]`
    ///
    pub fn n_states(&self) -> usize {
        self.prior.len()
    }
    pub fn transition(&self) -> &Array2<f64> {
        &self.transition
    }
    pub fn prior(&self) -> &Array1<f64> {
        &self.prior
    }
    ///
    /// Distribution of the next state given the current state `prev`.
    ///
    pub fn next_state_distribution(&self, prev: usize) -> ArrayView1<f64> {
        self.transition.column(prev)
    }
}

///
/// An observation modality with its likelihood tensor `A[g]`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Modality {
    ///
    /// `A[[o, s_0, .., s_{F-1}]]`
    ///
    likelihood: ArrayD<f64>,
}

impl Modality {
    pub fn new(likelihood: ArrayD<f64>) -> Modality {
        Modality { likelihood }
    }
    ///
    /// cardinality `No[g]`
    ///
    pub fn n_outcomes(&self) -> usize {
        self.likelihood.len_of(Axis(0))
    }
    pub fn likelihood(&self) -> &ArrayD<f64> {
        &self.likelihood
    }
    ///
    /// Likelihood slice `A[o, ..]` of an observed outcome,
    /// as a function of the factor states.
    ///
    pub fn observed(&self, outcome: usize) -> ArrayViewD<f64> {
        self.likelihood.index_axis(Axis(0), outcome)
    }
    ///
    /// Distribution of outcomes `A[:, s_0, .., s_{F-1}]` for the joint factor states.
    ///
    pub fn outcome_distribution(&self, states: &[usize]) -> Array1<f64> {
        let mut index = Vec::with_capacity(states.len() + 1);
        index.push(0);
        index.extend_from_slice(states);
        Array1::from_shape_fn(self.n_outcomes(), |o| {
            index[0] = o;
            self.likelihood[IxDyn(&index)]
        })
    }
}

///
/// Factorial HMM with validated parameters.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    factors: Vec<HiddenFactor>,
    modalities: Vec<Modality>,
    n_steps: usize,
}

impl Model {
    ///
    /// Build a model, checking that every prior, every transition column and
    /// every outcome slice of the likelihood tensors is a probability distribution.
    ///
    pub fn new(
        factors: Vec<HiddenFactor>,
        modalities: Vec<Modality>,
        n_steps: usize,
    ) -> Result<Model> {
        if factors.is_empty() {
            return Err(Error::InvalidModel("no hidden factor".to_string()));
        }
        if n_steps == 0 {
            return Err(Error::InvalidModel("zero time steps".to_string()));
        }
        for (f, factor) in factors.iter().enumerate() {
            check_factor(f, factor)?;
        }
        let n_states: Vec<usize> = factors.iter().map(|factor| factor.n_states()).collect();
        for (g, modality) in modalities.iter().enumerate() {
            check_modality(g, modality, &n_states)?;
        }
        debug!(
            "model: n_states={:?} n_outcomes={:?} n_steps={}",
            n_states,
            modalities.iter().map(|m| m.n_outcomes()).collect::<Vec<_>>(),
            n_steps
        );
        Ok(Model {
            factors,
            modalities,
            n_steps,
        })
    }
    pub fn n_factors(&self) -> usize {
        self.factors.len()
    }
    pub fn n_modalities(&self) -> usize {
        self.modalities.len()
    }
    ///
    /// horizon `T`
    ///
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }
    ///
    /// `Ns[f]` of all factors
    ///
    pub fn n_states(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.n_states()).collect()
    }
    ///
    /// `No[g]` of all modalities
    ///
    pub fn n_outcomes(&self) -> Vec<usize> {
        self.modalities.iter().map(|m| m.n_outcomes()).collect()
    }
    pub fn factor(&self, f: usize) -> &HiddenFactor {
        &self.factors[f]
    }
    pub fn modality(&self, g: usize) -> &Modality {
        &self.modalities[g]
    }
    pub fn factors(&self) -> &[HiddenFactor] {
        &self.factors
    }
    pub fn modalities(&self) -> &[Modality] {
        &self.modalities
    }
    ///
    /// Check that the observation trajectory fits this model:
    /// one row per modality, `T` outcomes per row, each outcome in `0..No[g]`.
    ///
    pub fn check_observations(&self, observations: &ObservationTrajectory) -> Result<()> {
        if observations.n_rows() != self.n_modalities() {
            return Err(Error::ShapeMismatch {
                what: "observation trajectory".to_string(),
                expected: vec![self.n_modalities()],
                got: vec![observations.n_rows()],
            });
        }
        for (g, modality) in self.modalities.iter().enumerate() {
            let row = observations.row(g);
            if row.len() != self.n_steps {
                return Err(Error::ShapeMismatch {
                    what: format!("observations of modality {}", g),
                    expected: vec![self.n_steps],
                    got: vec![row.len()],
                });
            }
            if let Some((t, &o)) = row
                .iter()
                .enumerate()
                .find(|(_, &o)| o >= modality.n_outcomes())
            {
                return Err(Error::InvalidObservation {
                    modality: g,
                    time: t,
                    reason: format!("outcome {} >= No={}", o, modality.n_outcomes()),
                });
            }
        }
        Ok(())
    }
    ///
    /// Check that the state trajectory fits this model:
    /// one row per factor, `T` states per row, each state in `0..Ns[f]`.
    ///
    pub fn check_states(&self, states: &StateTrajectory) -> Result<()> {
        if states.n_rows() != self.n_factors() {
            return Err(Error::ShapeMismatch {
                what: "state trajectory".to_string(),
                expected: vec![self.n_factors()],
                got: vec![states.n_rows()],
            });
        }
        for (f, factor) in self.factors.iter().enumerate() {
            let row = states.row(f);
            if row.len() != self.n_steps {
                return Err(Error::ShapeMismatch {
                    what: format!("states of factor {}", f),
                    expected: vec![self.n_steps],
                    got: vec![row.len()],
                });
            }
            if let Some((t, &s)) = row
                .iter()
                .enumerate()
                .find(|(_, &s)| s >= factor.n_states())
            {
                return Err(Error::InvalidState {
                    factor: f,
                    time: t,
                    reason: format!("state {} >= Ns={}", s, factor.n_states()),
                });
            }
        }
        Ok(())
    }
}

fn check_entries<'a, I: Iterator<Item = &'a f64>>(what: &str, values: I) -> Result<()> {
    for &value in values {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidProbability {
                what: what.to_string(),
                value,
            });
        }
    }
    Ok(())
}

fn check_sum(what: String, sum: f64) -> Result<()> {
    if (sum - 1.0).abs() > PROB_TOLERANCE {
        Err(Error::InvalidDistribution { what, sum })
    } else {
        Ok(())
    }
}

fn check_factor(f: usize, factor: &HiddenFactor) -> Result<()> {
    let n = factor.n_states();
    if n == 0 {
        return Err(Error::InvalidModel(format!("factor {} has no state", f)));
    }
    if factor.transition.dim() != (n, n) {
        return Err(Error::ShapeMismatch {
            what: format!("transition matrix of factor {}", f),
            expected: vec![n, n],
            got: factor.transition.shape().to_vec(),
        });
    }
    check_entries(&format!("prior of factor {}", f), factor.prior.iter())?;
    check_entries(&format!("transition of factor {}", f), factor.transition.iter())?;
    check_sum(format!("prior of factor {}", f), factor.prior.sum())?;
    for (j, column) in factor.transition.columns().into_iter().enumerate() {
        check_sum(
            format!("transition column {} of factor {}", j, f),
            column.sum(),
        )?;
    }
    Ok(())
}

fn check_modality(g: usize, modality: &Modality, n_states: &[usize]) -> Result<()> {
    let mut expected = vec![modality.likelihood.shape().first().copied().unwrap_or(0)];
    expected.extend_from_slice(n_states);
    if modality.likelihood.shape() != expected.as_slice() || expected[0] == 0 {
        return Err(Error::ShapeMismatch {
            what: format!("likelihood tensor of modality {}", g),
            expected,
            got: modality.likelihood.shape().to_vec(),
        });
    }
    check_entries(
        &format!("likelihood of modality {}", g),
        modality.likelihood.iter(),
    )?;
    let sums = modality.likelihood.sum_axis(Axis(0));
    for (states, &sum) in sums.indexed_iter() {
        check_sum(
            format!(
                "likelihood of modality {} at states {:?}",
                g,
                states.slice()
            ),
            sum,
        )?;
    }
    Ok(())
}
