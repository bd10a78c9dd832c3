//!
//! Functions behind the `fhmm` command line tool
//!
//! Outputs are written as JSON so that plotting tools can read trajectories,
//! beliefs, messages and traces.
//!
use crate::error::Result;
use crate::infer::{BpOutput, InferParams, Posterior, VmpOutput};
use crate::model::config::ModelConfig;
use crate::model::mocks::mock_two_factor;
use crate::model::Model;
use crate::sample::History;
use crate::utils::{mean_and_sd, timer};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

///
/// horizon of the built-in demo model
///
pub const DEMO_N_STEPS: usize = 15;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Vmp,
    Bp,
}

///
/// Result of `infer` subcommand
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub method: Method,
    pub params: InferParams,
    pub history: History,
    pub mean_true_state_posterior: f64,
    pub uniform_baseline: f64,
    pub vmp: Option<VmpOutput>,
    pub bp: Option<BpOutput>,
}

impl InferenceReport {
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let report = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(report)
    }
}

///
/// Load the model from json, or use the two-factor demo model if `path` is not given.
///
pub fn load_model(path: Option<&Path>) -> Result<Model> {
    match path {
        Some(path) => {
            info!("loading model from {}", path.display());
            ModelConfig::from_json_file(path)?.into_model()
        }
        None => {
            info!("using the demo model (T={})", DEMO_N_STEPS);
            Ok(mock_two_factor(DEMO_N_STEPS))
        }
    }
}

pub fn demo_model<P: AsRef<Path>>(output: P) -> Result<()> {
    mock_two_factor(DEMO_N_STEPS).to_config().to_json_file(output)
}

pub fn generate<P: AsRef<Path>>(model: &Model, seed: u64, output: P) -> Result<History> {
    let history = model.generate_from_seed(seed)?;
    info!("generated (seed={})\n{}", seed, history);
    history.to_json_file(output)?;
    Ok(history)
}

fn summarize<P: Posterior>(output: &P, history: &History) -> (f64, f64) {
    (
        output.mean_true_state_posterior(&history.states),
        output.uniform_baseline(),
    )
}

pub fn infer(
    model: &Model,
    history: History,
    method: Method,
    params: InferParams,
) -> Result<InferenceReport> {
    model.check_states(&history.states)?;
    let (output, t) = timer(|| -> Result<(Option<VmpOutput>, Option<BpOutput>)> {
        Ok(match method {
            Method::Vmp => (Some(model.run_vmp(&history.observations, &params)?), None),
            Method::Bp => (None, Some(model.run_bp(&history.observations, &params)?)),
        })
    });
    let (vmp, bp) = output?;
    let (mean, baseline) = match (&vmp, &bp) {
        (Some(o), _) => summarize(o, &history),
        (_, Some(o)) => summarize(o, &history),
        (None, None) => (f64::NAN, f64::NAN),
    };
    info!(
        "{:?}: mean posterior of true states={:.4} (uniform={:.4}) in {}ms",
        method, mean, baseline, t
    );
    Ok(InferenceReport {
        method,
        params,
        history,
        mean_true_state_posterior: mean,
        uniform_baseline: baseline,
        vmp,
        bp,
    })
}

///
/// Summary of `evaluate` subcommand
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub n_seeds: usize,
    pub vmp: Vec<f64>,
    pub bp: Vec<f64>,
    pub uniform_baseline: f64,
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (vmp_mean, vmp_sd) = mean_and_sd(&self.vmp);
        let (bp_mean, bp_sd) = mean_and_sd(&self.bp);
        writeln!(f, "n_seeds\t{}", self.n_seeds)?;
        writeln!(f, "uniform\t{:.4}", self.uniform_baseline)?;
        writeln!(f, "vmp\t{:.4}\t(sd={:.4})", vmp_mean, vmp_sd)?;
        write!(f, "bp\t{:.4}\t(sd={:.4})", bp_mean, bp_sd)
    }
}

///
/// Run VMP and BP on trajectories generated from seeds `0..n_seeds` (in parallel),
/// and collect the mean posterior mass put on the true states.
///
pub fn evaluate(model: &Model, n_seeds: u64, params: InferParams) -> Result<Evaluation> {
    let params = params.without_trace();
    let scores = (0..n_seeds)
        .into_par_iter()
        .map(|seed| {
            let history = model.generate_from_seed(seed)?;
            let vmp = model.run_vmp(&history.observations, &params)?;
            let bp = model.run_bp(&history.observations, &params)?;
            Ok((
                vmp.mean_true_state_posterior(&history.states),
                bp.mean_true_state_posterior(&history.states),
                vmp.uniform_baseline(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Evaluation {
        n_seeds: scores.len(),
        vmp: scores.iter().map(|s| s.0).collect(),
        bp: scores.iter().map(|s| s.1).collect(),
        uniform_baseline: scores.first().map_or(f64::NAN, |s| s.2),
    })
}
