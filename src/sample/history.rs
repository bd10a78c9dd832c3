//!
//! Structs for storing sampling results
//!
use serde::{Deserialize, Serialize};

///
/// `s[f][t]`: state of factor `f` at time `t`
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTrajectory(pub Vec<Vec<usize>>);

///
/// `o[g][t]`: outcome of modality `g` at time `t`
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationTrajectory(pub Vec<Vec<usize>>);

impl StateTrajectory {
    ///
    /// number of factors
    ///
    pub fn n_rows(&self) -> usize {
        self.0.len()
    }
    pub fn row(&self, f: usize) -> &[usize] {
        &self.0[f]
    }
    ///
    /// Joint states `(s[0][t], .., s[F-1][t])` at time `t`
    ///
    pub fn joint(&self, t: usize) -> Vec<usize> {
        self.0.iter().map(|row| row[t]).collect()
    }
}

impl ObservationTrajectory {
    ///
    /// number of modalities
    ///
    pub fn n_rows(&self) -> usize {
        self.0.len()
    }
    pub fn row(&self, g: usize) -> &[usize] {
        &self.0[g]
    }
    ///
    /// `o[g][t]`
    ///
    pub fn outcome(&self, g: usize, t: usize) -> usize {
        self.0[g][t]
    }
}

///
/// Ground truth states and the observations emitted from them
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub states: StateTrajectory,
    pub observations: ObservationTrajectory,
}

impl History {
    ///
    /// number of time steps
    ///
    pub fn len(&self) -> usize {
        self.states.0.first().map_or(0, |row| row.len())
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn to_json_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::error::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> crate::error::Result<Self> {
        let file = std::fs::File::open(path)?;
        let history = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(history)
    }
}

impl std::fmt::Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, row) in self.states.0.iter().enumerate() {
            writeln!(f, "s[{}]\t{:?}", i, row)?;
        }
        for (i, row) in self.observations.0.iter().enumerate() {
            writeln!(f, "o[{}]\t{:?}", i, row)?;
        }
        Ok(())
    }
}
