//!
//! globally-available parts
//!
pub use crate::error::{Error, Result};
pub use crate::infer::{BpOutput, InferParams, Posterior, Trace, VmpOutput};
pub use crate::model::{HiddenFactor, Modality, Model};
pub use crate::sample::{History, ObservationTrajectory, StateTrajectory};
