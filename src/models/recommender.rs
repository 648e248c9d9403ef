use std::hash::Hash;

#[cfg(feature = "python")]
use numpy::{PyArray1, ToPyArray};
#[cfg(feature = "python")]
use pyo3::prelude::*;

use crate::error::Result;
use crate::models::base_model::{Algo, Prediction};
use crate::models::baseline::BaselineBiasModel;
use crate::models::options::BaselineOptions;
use crate::utils::accuracy;
use crate::utils::trainset::Rating;

pub const DEFAULT_N_EPOCHS: usize = 25;
pub const DEFAULT_REG_U: f64 = 5.0;
pub const DEFAULT_REG_I: f64 = 3.0;

/// ALS baselines used as the reference point for other recommenders.
///
/// Fits with 25 epochs, `reg_u = 5` and `reg_i = 3` unless built with other options.
pub struct BaseLineRecommender<U, I> {
    model: BaselineBiasModel<U, I>,
}

impl<U, I> Default for BaseLineRecommender<U, I> {
    fn default() -> Self {
        BaseLineRecommender::with_options(BaselineOptions::als(
            DEFAULT_N_EPOCHS,
            DEFAULT_REG_U,
            DEFAULT_REG_I,
        ))
    }
}

impl<U, I> BaseLineRecommender<U, I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BaselineOptions) -> Self {
        BaseLineRecommender {
            model: BaselineBiasModel::new(options),
        }
    }

    pub fn model(&self) -> &BaselineBiasModel<U, I> {
        &self.model
    }
}

impl<U, I> BaseLineRecommender<U, I>
where
    U: Eq + Hash + Clone + Sync,
    I: Eq + Hash + Clone + Sync,
{
    pub fn fit(&mut self, train: &[Rating<U, I>]) -> Result<()> {
        self.model.fit(train)
    }

    pub fn predict(&self, user: &U, item: &I) -> Result<Prediction<U, I>> {
        self.model.predict(user, item, None, true)
    }

    pub fn test(&self, test: &[Rating<U, I>]) -> Result<Vec<Prediction<U, I>>> {
        self.model.test(test)
    }

    pub fn rmse(&self, test: &[Rating<U, I>]) -> Result<f64> {
        accuracy::rmse_predictions(&self.test(test)?)
    }

    pub fn mae(&self, test: &[Rating<U, I>]) -> Result<f64> {
        accuracy::mae_predictions(&self.test(test)?)
    }

    pub fn fcp(&self, test: &[Rating<U, I>]) -> Result<f64> {
        accuracy::fcp(&self.test(test)?)
    }

    pub fn global_mean(&self) -> Result<f64> {
        self.model.global_mean()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }
}

/// User or item id coming from Python: either an `int` or a `str`.
#[cfg(feature = "python")]
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromPyObject)]
pub enum RawId {
    Int(i64),
    Str(String),
}

#[cfg(feature = "python")]
impl IntoPy<PyObject> for RawId {
    fn into_py(self, py: Python<'_>) -> PyObject {
        match self {
            RawId::Int(id) => id.into_py(py),
            RawId::Str(id) => id.into_py(py),
        }
    }
}

#[cfg(feature = "python")]
type PyTriple = (RawId, RawId, f64);

#[cfg(feature = "python")]
fn to_ratings(triples: Vec<PyTriple>) -> Vec<Rating<RawId, RawId>> {
    triples.into_iter().map(Rating::from).collect()
}

/// Python‐exposed view of a `Prediction`
#[cfg(feature = "python")]
#[pyclass(name = "Prediction")]
pub struct PyPrediction {
    #[pyo3(get)]
    uid: PyObject,
    #[pyo3(get)]
    iid: PyObject,
    #[pyo3(get)]
    r_ui: Option<f64>,
    #[pyo3(get)]
    est: f64,
    #[pyo3(get)]
    known_user: bool,
    #[pyo3(get)]
    known_item: bool,
}

#[cfg(feature = "python")]
impl PyPrediction {
    fn from_prediction(py: Python<'_>, pred: Prediction<RawId, RawId>) -> Self {
        PyPrediction {
            uid: pred.uid.into_py(py),
            iid: pred.iid.into_py(py),
            r_ui: pred.r_ui,
            est: pred.est,
            known_user: pred.details.known_user,
            known_item: pred.details.known_item,
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl PyPrediction {
    fn __repr__(&self, py: Python<'_>) -> PyResult<String> {
        let r_ui = match self.r_ui {
            Some(r) => format!("{r:.2}"),
            None => "None".to_string(),
        };
        Ok(format!(
            "Prediction(uid={}, iid={}, r_ui={}, est={:.2}, known_user={}, known_item={})",
            self.uid.as_ref(py).repr()?,
            self.iid.as_ref(py).repr()?,
            r_ui,
            self.est,
            self.known_user,
            self.known_item
        ))
    }
}

/// Python‐exposed wrapper around BaseLineRecommender
#[cfg(feature = "python")]
#[pyclass(name = "BaseLineRecommender")]
pub struct PyBaseLineRecommender {
    inner: BaseLineRecommender<RawId, RawId>,
}

#[cfg(feature = "python")]
#[pymethods]
impl PyBaseLineRecommender {
    #[new]
    #[pyo3(signature = (n_epochs=DEFAULT_N_EPOCHS, reg_u=DEFAULT_REG_U, reg_i=DEFAULT_REG_I, rating_scale=Some((1.0, 5.0))))]
    fn new(n_epochs: usize, reg_u: f64, reg_i: f64, rating_scale: Option<(f64, f64)>) -> PyResult<Self> {
        let mut options = BaselineOptions::als(n_epochs, reg_u, reg_i);
        options.rating_scale = rating_scale;
        options.validate()?;
        Ok(PyBaseLineRecommender {
            inner: BaseLineRecommender::with_options(options),
        })
    }

    fn fit(&mut self, train: Vec<PyTriple>) -> PyResult<()> {
        Ok(self.inner.fit(&to_ratings(train))?)
    }

    fn predict(&self, py: Python<'_>, user_id: RawId, item_id: RawId) -> PyResult<PyPrediction> {
        let pred = self.inner.predict(&user_id, &item_id)?;
        Ok(PyPrediction::from_prediction(py, pred))
    }

    fn test(&self, py: Python<'_>, testset: Vec<PyTriple>) -> PyResult<Vec<PyPrediction>> {
        let preds = self.inner.test(&to_ratings(testset))?;
        Ok(preds
            .into_iter()
            .map(|p| PyPrediction::from_prediction(py, p))
            .collect())
    }

    fn rmse(&self, test: Vec<PyTriple>) -> PyResult<f64> {
        Ok(self.inner.rmse(&to_ratings(test))?)
    }

    fn mae(&self, test: Vec<PyTriple>) -> PyResult<f64> {
        Ok(self.inner.mae(&to_ratings(test))?)
    }

    #[getter]
    fn global_mean(&self) -> PyResult<f64> {
        Ok(self.inner.global_mean()?)
    }

    fn user_biases<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(self.inner.model().user_biases()?.to_pyarray(py))
    }

    fn item_biases<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(self.inner.model().item_biases()?.to_pyarray(py))
    }
}
