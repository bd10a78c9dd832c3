//!
//! Tensor contraction of likelihood tensors against beliefs
//!
//! A likelihood slice `A[g][o, ..]` has one axis per hidden factor.
//! Contracting an axis with the belief of that factor computes the expectation
//! over the factor, leaving the dependency on the other factors intact.
//!
use crate::error::{Error, Result};
use ndarray::prelude::*;

///
/// Multiply `tensor` by `belief` broadcast along `axis` and sum along `axis`.
///
/// The result has rank `tensor.ndim() - 1` and keeps the remaining axes in their original order.
///
/// ```text
/// r[.., j, ..] = \sum_k tensor[.., k (at axis), j, ..] belief[k]
/// ```
///
pub fn contract<S>(
    tensor: &ArrayBase<S, IxDyn>,
    belief: ArrayView1<f64>,
    axis: usize,
) -> Result<ArrayD<f64>>
where
    S: ndarray::Data<Elem = f64>,
{
    if axis >= tensor.ndim() {
        return Err(Error::ShapeMismatch {
            what: format!("contraction axis {}", axis),
            expected: vec![tensor.ndim()],
            got: vec![axis],
        });
    }
    let n = tensor.len_of(Axis(axis));
    if belief.len() != n {
        return Err(Error::ShapeMismatch {
            what: format!("belief vector for axis {}", axis),
            expected: vec![n],
            got: vec![belief.len()],
        });
    }

    let mut shape = tensor.shape().to_vec();
    shape.remove(axis);
    let mut ret = ArrayD::zeros(IxDyn(&shape));
    for (k, &w) in belief.iter().enumerate() {
        ret.scaled_add(w, &tensor.index_axis(Axis(axis), k));
    }
    Ok(ret)
}

///
/// Contract every axis of `tensor` except `keep`, with `beliefs[axis]` for each axis.
///
/// Returns a vector over the states of axis `keep`.
/// `beliefs[keep]` itself is not used.
///
pub fn marginalize_except<S>(
    tensor: &ArrayBase<S, IxDyn>,
    beliefs: &[ArrayView1<f64>],
    keep: usize,
) -> Result<Array1<f64>>
where
    S: ndarray::Data<Elem = f64>,
{
    if beliefs.len() != tensor.ndim() || keep >= tensor.ndim() {
        return Err(Error::ShapeMismatch {
            what: format!("beliefs for marginalization keeping axis {}", keep),
            expected: vec![tensor.ndim()],
            got: vec![beliefs.len()],
        });
    }

    // contract from the last axis so that the index of the lower axes is unchanged.
    let mut ret = tensor.to_owned();
    for axis in (0..tensor.ndim()).rev() {
        if axis != keep {
            ret = contract(&ret, beliefs[axis].view(), axis)?;
        }
    }

    let got = ret.shape().to_vec();
    ret.into_dimensionality::<Ix1>()
        .map_err(|_| Error::ShapeMismatch {
            what: "marginalized tensor".to_string(),
            expected: vec![tensor.len_of(Axis(keep))],
            got,
        })
}
