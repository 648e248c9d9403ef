//! Error types for baseline fitting, prediction and evaluation.

use thiserror::Error;

/// Errors raised by the trainset, the baseline model and the accuracy metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BaselineError {
    /// The caller handed over data the operation cannot work with
    /// (empty training set, empty metric input, prediction without a true rating).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A model query was made before `fit` completed.
    #[error("model is not fitted, call fit first")]
    NotFitted,

    /// An option was outside its allowed range.
    #[error("invalid hyperparameter {param}={value}: {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The dedicated rayon pool requested through `n_jobs` could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl BaselineError {
    pub(crate) fn hyperparameter(param: &str, value: impl ToString, constraint: &str) -> Self {
        BaselineError::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for BaselineError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        BaselineError::ThreadPool(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<BaselineError> for pyo3::PyErr {
    fn from(err: BaselineError) -> Self {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};
        match err {
            BaselineError::NotFitted | BaselineError::ThreadPool(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BaselineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            BaselineError::NotFitted.to_string(),
            "model is not fitted, call fit first"
        );
        let err = BaselineError::hyperparameter("reg_u", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid hyperparameter reg_u=-1: must be non-negative"
        );
        assert!(BaselineError::InvalidInput("empty training set".into())
            .to_string()
            .contains("empty training set"));
    }
}
