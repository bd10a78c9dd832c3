//!
//! Damped variational message passing (VMP) and belief propagation (BP)
//! for factorial hidden Markov models
//!
//! * `model`: hidden factors, observation modalities and their validation
//! * `sample`: generate state/observation trajectories from a model
//! * `tensor`: contraction of likelihood tensors against beliefs
//! * `infer`: VMP and BP engines
//!
#[macro_use]
extern crate approx;

pub mod cli;
pub mod error;
pub mod infer;
pub mod model;
pub mod prelude;
pub mod prob;
pub mod sample;
pub mod tensor;
pub mod utils;
