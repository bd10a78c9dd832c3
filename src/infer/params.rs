//!
//! InferParams for VMP/BP
//!
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

///
/// Parameters shared by the VMP and BP engines
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferParams {
    ///
    /// damping factor: each update moves the log belief `1/tau` of the way
    /// toward the combined evidence
    pub tau: f64,
    ///
    /// number of inner iterations `Ni` per outer time step
    pub n_iter: usize,
    ///
    /// record every belief update into the trace tensors
    pub record_trace: bool,
}

impl InferParams {
    pub fn new(tau: f64, n_iter: usize) -> InferParams {
        InferParams {
            tau,
            n_iter,
            record_trace: true,
        }
    }
    ///
    /// Same params but the trace tensors are not recorded
    ///
    pub fn without_trace(self) -> InferParams {
        InferParams {
            record_trace: false,
            ..self
        }
    }
    pub fn validate(&self) -> Result<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(Error::InvalidParams(format!(
                "tau must be positive, got {}",
                self.tau
            )));
        }
        Ok(())
    }
}

/// `tau=4, Ni=16` with trace
impl Default for InferParams {
    fn default() -> Self {
        InferParams::new(4.0, 16)
    }
}

impl std::fmt::Display for InferParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "tau={} n_iter={} record_trace={}",
            self.tau, self.n_iter, self.record_trace
        )
    }
}
