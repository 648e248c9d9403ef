//! Accuracy metrics over (actual, predicted) rating pairs.
//!
//! Every reduction sums first and divides once, so the order of the pairs does not
//! matter. Empty input is rejected rather than reported as zero error.

use std::collections::HashMap;
use std::hash::Hash;

#[cfg(feature = "python")]
use pyo3::prelude::*;

use crate::error::{BaselineError, Result};
use crate::models::base_model::Prediction;

fn ensure_non_empty<T>(values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(BaselineError::InvalidInput(
            "prediction list is empty".to_string(),
        ));
    }
    Ok(())
}

/// Mean squared error of `(actual, predicted)` pairs.
pub fn mse(pairs: &[(f64, f64)]) -> Result<f64> {
    ensure_non_empty(pairs)?;
    let sum_sq: f64 = pairs.iter().map(|(r, est)| (r - est).powi(2)).sum();
    Ok(sum_sq / pairs.len() as f64)
}

/// Root mean squared error of `(actual, predicted)` pairs.
///
/// ```
/// use baseline_rust::utils::accuracy::rmse;
///
/// let error = rmse(&[(3.0, 3.0), (4.0, 2.0)]).unwrap();
/// assert!((error - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn rmse(pairs: &[(f64, f64)]) -> Result<f64> {
    Ok(mse(pairs)?.sqrt())
}

/// Mean absolute error of `(actual, predicted)` pairs.
pub fn mae(pairs: &[(f64, f64)]) -> Result<f64> {
    ensure_non_empty(pairs)?;
    let sum_abs: f64 = pairs.iter().map(|(r, est)| (r - est).abs()).sum();
    Ok(sum_abs / pairs.len() as f64)
}

/// Pull `(r_ui, est)` out of predictions made against a test set.
pub fn prediction_pairs<U, I>(predictions: &[Prediction<U, I>]) -> Result<Vec<(f64, f64)>> {
    predictions
        .iter()
        .map(|p| {
            p.r_ui.map(|r| (r, p.est)).ok_or_else(|| {
                BaselineError::InvalidInput(
                    "prediction has no true rating to compare against".to_string(),
                )
            })
        })
        .collect()
}

pub fn rmse_predictions<U, I>(predictions: &[Prediction<U, I>]) -> Result<f64> {
    rmse(&prediction_pairs(predictions)?)
}

pub fn mae_predictions<U, I>(predictions: &[Prediction<U, I>]) -> Result<f64> {
    mae(&prediction_pairs(predictions)?)
}

pub fn mse_predictions<U, I>(predictions: &[Prediction<U, I>]) -> Result<f64> {
    mse(&prediction_pairs(predictions)?)
}

/// Fraction of Concordant Pairs.
///
/// Concordant and discordant pair counts are taken per user, averaged over users,
/// and combined as `nc / (nc + nd)`.
pub fn fcp<U, I>(predictions: &[Prediction<U, I>]) -> Result<f64>
where
    U: Eq + Hash,
{
    ensure_non_empty(predictions)?;

    let mut by_user: HashMap<&U, Vec<(f64, f64)>> = HashMap::new();
    for (p, pair) in predictions.iter().zip(prediction_pairs(predictions)?) {
        by_user.entry(&p.uid).or_default().push(pair);
    }

    let mut nc_total = 0.0;
    let mut nd_total = 0.0;
    for preds in by_user.values() {
        let mut nc = 0usize;
        let mut nd = 0usize;
        for &(r_i, est_i) in preds {
            for &(r_j, est_j) in preds {
                if est_i > est_j && r_i > r_j {
                    nc += 1;
                }
                if est_i >= est_j && r_i < r_j {
                    nd += 1;
                }
            }
        }
        nc_total += nc as f64;
        nd_total += nd as f64;
    }

    let n_users = by_user.len() as f64;
    let nc = nc_total / n_users;
    let nd = nd_total / n_users;
    if nc + nd == 0.0 {
        return Err(BaselineError::InvalidInput(
            "cannot compute fcp, no user has two predictions with distinct ratings".to_string(),
        ));
    }

    Ok(nc / (nc + nd))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "rmse")]
pub fn py_rmse(pairs: Vec<(f64, f64)>) -> PyResult<f64> {
    Ok(rmse(&pairs)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "mae")]
pub fn py_mae(pairs: Vec<(f64, f64)>) -> PyResult<f64> {
    Ok(mae(&pairs)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "mse")]
pub fn py_mse(pairs: Vec<(f64, f64)>) -> PyResult<f64> {
    Ok(mse(&pairs)?)
}
