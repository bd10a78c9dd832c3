//!
//! JSON representation of a model
//!
//! ```json
//! {
//!   "factors": [{ "prior": [1.0, 0.0], "transition": [[1.0, 0.0], [0.0, 1.0]] }],
//!   "modalities": [{ "n_outcomes": 2, "likelihood": [1.0, 0.0, 0.0, 1.0] }],
//!   "n_steps": 5
//! }
//! ```
//!
//! * `transition[next][prev]`, so each *column* sums to 1.
//! * `likelihood` is a flattened row-major tensor of shape `(n_outcomes, Ns[0], .., Ns[F-1])`.
//!
use super::{HiddenFactor, Model, Modality};
use crate::error::{Error, Result};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorConfig {
    pub prior: Vec<f64>,
    pub transition: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModalityConfig {
    pub n_outcomes: usize,
    pub likelihood: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub factors: Vec<FactorConfig>,
    pub modalities: Vec<ModalityConfig>,
    pub n_steps: usize,
}

impl ModelConfig {
    ///
    /// Convert into a validated `Model`.
    ///
    pub fn into_model(self) -> Result<Model> {
        let n_states: Vec<usize> = self.factors.iter().map(|f| f.prior.len()).collect();

        let factors = self
            .factors
            .into_iter()
            .enumerate()
            .map(|(f, config)| {
                let n = config.prior.len();
                if config.transition.len() != n || config.transition.iter().any(|r| r.len() != n) {
                    return Err(Error::ShapeMismatch {
                        what: format!("transition matrix of factor {}", f),
                        expected: vec![n, n],
                        got: vec![
                            config.transition.len(),
                            config.transition.first().map_or(0, |r| r.len()),
                        ],
                    });
                }
                let transition = Array2::from_shape_fn((n, n), |(i, j)| config.transition[i][j]);
                Ok(HiddenFactor::new(transition, Array1::from(config.prior)))
            })
            .collect::<Result<Vec<_>>>()?;

        let modalities = self
            .modalities
            .into_iter()
            .enumerate()
            .map(|(g, config)| {
                let mut shape = vec![config.n_outcomes];
                shape.extend_from_slice(&n_states);
                let got = config.likelihood.len();
                ArrayD::from_shape_vec(IxDyn(&shape), config.likelihood)
                    .map(Modality::new)
                    .map_err(|_| Error::ShapeMismatch {
                        what: format!("likelihood tensor of modality {}", g),
                        expected: shape.clone(),
                        got: vec![got],
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Model::new(factors, modalities, self.n_steps)
    }
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
    pub fn to_json_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Model {
    ///
    /// JSON-friendly representation of this model
    ///
    pub fn to_config(&self) -> ModelConfig {
        ModelConfig {
            factors: self
                .factors()
                .iter()
                .map(|factor| FactorConfig {
                    prior: factor.prior().to_vec(),
                    transition: factor
                        .transition()
                        .rows()
                        .into_iter()
                        .map(|row| row.to_vec())
                        .collect(),
                })
                .collect(),
            modalities: self
                .modalities()
                .iter()
                .map(|modality| ModalityConfig {
                    n_outcomes: modality.n_outcomes(),
                    likelihood: modality.likelihood().iter().copied().collect(),
                })
                .collect(),
            n_steps: self.n_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mocks::*;
    use super::*;

    #[test]
    fn config_from_json_str() {
        let s = r#"{
            "factors": [{ "prior": [1.0, 0.0], "transition": [[1.0, 0.0], [0.0, 1.0]] }],
            "modalities": [{ "n_outcomes": 2, "likelihood": [1.0, 0.0, 0.0, 1.0] }],
            "n_steps": 5
        }"#;
        let config: ModelConfig = serde_json::from_str(s).unwrap();
        let model = config.into_model().unwrap();
        assert_eq!(model, mock_identity(5));
    }
    #[test]
    fn config_to_model_and_back() {
        let model = mock_two_factor(7);
        let config = model.to_config();
        assert_eq!(config.factors[0].transition[1][0], 0.8);
        assert_eq!(config.modalities[1].likelihood.len(), 27);
        let model2 = config.into_model().unwrap();
        assert_eq!(model, model2);
    }
    #[test]
    fn config_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = mock_random(&[2, 3], &[4], 6, 3);
        model.to_config().to_json_file(&path).unwrap();
        let model2 = ModelConfig::from_json_file(&path)
            .unwrap()
            .into_model()
            .unwrap();
        assert_eq!(model.n_states(), model2.n_states());
        assert_eq!(model.n_outcomes(), model2.n_outcomes());
    }
    #[test]
    fn config_wrong_likelihood_length() {
        let mut config = mock_identity(3).to_config();
        config.modalities[0].likelihood.pop();
        assert!(matches!(
            config.into_model(),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
