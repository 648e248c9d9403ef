#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod error;
pub mod models;
pub mod utils;

pub use error::{BaselineError, Result};
pub use models::base_model::{Algo, Prediction, PredictionDetails};
pub use models::baseline::BaselineBiasModel;
pub use models::options::{BaselineMethod, BaselineOptions};
pub use models::recommender::BaseLineRecommender;
pub use utils::trainset::{Rating, Trainset};

#[cfg(feature = "python")]
use models::recommender::{PyBaseLineRecommender, PyPrediction};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn baseline_rust(_py: Python, m: &PyModule) -> PyResult<()> {
    // BaseLineRecommender:
    m.add_class::<PyBaseLineRecommender>()?;
    m.add_class::<PyPrediction>()?;

    // Accuracy:
    m.add_function(wrap_pyfunction!(utils::accuracy::py_rmse, m)?)?;
    m.add_function(wrap_pyfunction!(utils::accuracy::py_mae, m)?)?;
    m.add_function(wrap_pyfunction!(utils::accuracy::py_mse, m)?)?;
    Ok(())
}
