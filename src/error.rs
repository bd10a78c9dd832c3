//!
//! Error types of model construction, sampling and inference
//!
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    ///
    /// A prior, a transition column or a likelihood slice does not sum to 1.
    ///
    #[error("{what} is not a probability distribution (sums to {sum})")]
    InvalidDistribution { what: String, sum: f64 },
    ///
    /// An entry is negative, NaN or infinite.
    ///
    #[error("{what} has an invalid probability {value}")]
    InvalidProbability { what: String, value: f64 },
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("invalid inference parameters: {0}")]
    InvalidParams(String),
    ///
    /// Categorical sampling could not find an index for the draw.
    /// Only reachable with a distribution that escaped validation.
    ///
    #[error("categorical sampling failed: draw {draw} is not below the total mass {total}")]
    Sampling { draw: f64, total: f64 },
    #[error("shape mismatch in {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("invalid observation of modality {modality} at t={time}: {reason}")]
    InvalidObservation {
        modality: usize,
        time: usize,
        reason: String,
    },
    #[error("invalid state of factor {factor} at t={time}: {reason}")]
    InvalidState {
        factor: usize,
        time: usize,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
