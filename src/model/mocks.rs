//!
//! Mock models for testing and demos
//!
use super::{HiddenFactor, Model, Modality};
use ndarray::prelude::*;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// Three-state transition that moves `s -> s+1 (mod 3)` with `p=0.8`
/// and to each of the other states with `p=0.1`.
///
pub fn cyclic_transition() -> Array2<f64> {
    Array2::from_shape_fn((3, 3), |(next, prev)| {
        if next == (prev + 1) % 3 {
            0.8
        } else {
            0.1
        }
    })
}

///
/// Two-factor, three-state, two-modality demo model.
///
/// * `B[0] = B[1]` = `cyclic_transition()`
/// * `D[0] = [0, 0, 1]`, `D[1] = [1, 0, 0]`
/// * modality 0 reports the state of factor 0 (`p=0.8`, otherwise `p=0.1`)
/// * modality 1 reports the state of factor 1 (`p=0.75`), and the remaining mass
///   leans to the state of factor 0.
///
/// ```text
/// A[1][o, s0, s1] = 0.75   if o == s1
///                 = 0.2    if o == s0 != s1
///                 = 0.05   if o != s0 and o != s1 and s0 != s1
///                 = 0.125  if o != s1 and s0 == s1
/// ```
///
pub fn mock_two_factor(n_steps: usize) -> Model {
    let factors = vec![
        HiddenFactor::new(cyclic_transition(), array![0.0, 0.0, 1.0]),
        HiddenFactor::new(cyclic_transition(), array![1.0, 0.0, 0.0]),
    ];
    let a0 = Array3::from_shape_fn((3, 3, 3), |(o, s0, _)| if o == s0 { 0.8 } else { 0.1 });
    let a1 = Array3::from_shape_fn((3, 3, 3), |(o, s0, s1)| {
        if o == s1 {
            0.75
        } else if s0 == s1 {
            0.125
        } else if o == s0 {
            0.2
        } else {
            0.05
        }
    });
    let modalities = vec![Modality::new(a0.into_dyn()), Modality::new(a1.into_dyn())];
    Model::new(factors, modalities, n_steps).unwrap()
}

///
/// Single binary factor that never changes its state (`B = I`, `D = [1, 0]`),
/// observed without noise (`A = I`).
///
pub fn mock_identity(n_steps: usize) -> Model {
    let factors = vec![HiddenFactor::new(Array2::eye(2), array![1.0, 0.0])];
    let modalities = vec![Modality::new(Array2::eye(2).into_dyn())];
    Model::new(factors, modalities, n_steps).unwrap()
}

///
/// Random model with the given cardinalities.
/// Every entry is drawn from `[0.1, 1.0)` and then normalized along the required axis.
///
pub fn mock_random(n_states: &[usize], n_outcomes: &[usize], n_steps: usize, seed: u64) -> Model {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let factors = n_states
        .iter()
        .map(|&n| {
            let transition = Array2::from_shape_fn((n, n), |_| rng.gen_range(0.1..1.0));
            let transition = &transition / &transition.sum_axis(Axis(0)).insert_axis(Axis(0));
            let prior = Array1::from_shape_fn(n, |_| rng.gen_range(0.1..1.0));
            let prior = &prior / prior.sum();
            HiddenFactor::new(transition, prior)
        })
        .collect();

    let modalities = n_outcomes
        .iter()
        .map(|&n| {
            let mut shape = vec![n];
            shape.extend_from_slice(n_states);
            let likelihood = ArrayD::from_shape_fn(IxDyn(&shape), |_| rng.gen_range(0.1..1.0));
            let sums = likelihood.sum_axis(Axis(0)).insert_axis(Axis(0));
            Modality::new(&likelihood / &sums)
        })
        .collect();

    Model::new(factors, modalities, n_steps).unwrap()
}
