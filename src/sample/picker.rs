use crate::error::{Error, Result};
use crate::prob::PROB_TOLERANCE;
use ndarray::prelude::*;
use rand::prelude::*;

///
/// Inverse-CDF categorical sampling.
///
/// Returns the smallest index `i` whose cumulative mass `probs[0] + .. + probs[i]`
/// strictly exceeds the uniform draw `u` in `[0, 1)`. An index with zero mass is
/// never picked. When `u` lands exactly on a cumulative boundary, the next index
/// is picked (`u < cumsum`, not `u <= cumsum`).
///
/// A total mass within `PROB_TOLERANCE` of 1 is accepted as a distribution, so a
/// draw above the total picks the last index with positive mass.
/// Otherwise, if the total mass does not exceed `u`, this fails with
/// `Error::Sampling` instead of returning an arbitrary index.
///
pub fn pick_categorical(probs: ArrayView1<f64>, u: f64) -> Result<usize> {
    let mut cumsum = 0.0;
    let mut last = None;
    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if p > 0.0 {
            last = Some(i);
        }
        if u < cumsum {
            return Ok(i);
        }
    }
    match last {
        Some(i) if (cumsum - 1.0).abs() <= PROB_TOLERANCE => Ok(i),
        _ => Err(Error::Sampling {
            draw: u,
            total: cumsum,
        }),
    }
}

///
/// Draw `u ~ U[0, 1)` from `rng` and pick with `pick_categorical`.
///
pub fn pick_with_rng<R: Rng>(rng: &mut R, probs: ArrayView1<f64>) -> Result<usize> {
    let u: f64 = rng.gen();
    pick_categorical(probs, u)
}
