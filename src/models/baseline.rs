use std::hash::Hash;

use log::{debug, info, log_enabled, Level};
use ndarray::Array1;
use rayon::prelude::*;

use crate::error::{BaselineError, Result};
use crate::models::base_model::{Algo, PredictionDetails};
use crate::models::options::{BaselineMethod, BaselineOptions};
use crate::utils::trainset::{Rating, Trainset};

/// Parameters of a fitted model; only exists once `fit` has succeeded.
struct FittedBaselines<U, I> {
    trainset: Trainset<U, I>,
    bu: Array1<f64>,
    bi: Array1<f64>,
}

/// Baseline-bias rating predictor: `r̂_ui = μ + b_u + b_i`.
///
/// Users and items absent from the training set contribute a bias of 0.
///
/// ```
/// use baseline_rust::{Algo, BaselineBiasModel, BaselineOptions, Rating};
///
/// let train = vec![
///     Rating::new("u1", "i1", 4.0),
///     Rating::new("u1", "i2", 2.0),
///     Rating::new("u2", "i1", 3.0),
/// ];
/// let mut model = BaselineBiasModel::new(BaselineOptions::als(1, 5.0, 3.0));
/// model.fit(&train).unwrap();
///
/// assert_eq!(model.global_mean().unwrap(), 3.0);
/// let pred = model.predict(&"u1", &"i1", None, true).unwrap();
/// assert!((pred.est - 3.2).abs() < 1e-12);
/// ```
pub struct BaselineBiasModel<U, I> {
    options: BaselineOptions,
    fitted: Option<FittedBaselines<U, I>>,
}

impl<U, I> BaselineBiasModel<U, I> {
    pub fn new(options: BaselineOptions) -> Self {
        BaselineBiasModel {
            options,
            fitted: None,
        }
    }

    pub fn options(&self) -> &BaselineOptions {
        &self.options
    }

    fn fitted(&self) -> Result<&FittedBaselines<U, I>> {
        self.fitted.as_ref().ok_or(BaselineError::NotFitted)
    }

    pub fn global_mean(&self) -> Result<f64> {
        Ok(self.fitted()?.trainset.global_mean())
    }

    /// User biases indexed by inner user id.
    pub fn user_biases(&self) -> Result<&Array1<f64>> {
        Ok(&self.fitted()?.bu)
    }

    /// Item biases indexed by inner item id.
    pub fn item_biases(&self) -> Result<&Array1<f64>> {
        Ok(&self.fitted()?.bi)
    }

    pub fn trainset(&self) -> Result<&Trainset<U, I>> {
        Ok(&self.fitted()?.trainset)
    }
}

impl<U, I> BaselineBiasModel<U, I>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    pub fn user_bias(&self, user: &U) -> Result<f64> {
        let fitted = self.fitted()?;
        Ok(fitted
            .trainset
            .to_inner_uid(user)
            .map_or(0.0, |u| fitted.bu[u]))
    }

    pub fn item_bias(&self, item: &I) -> Result<f64> {
        let fitted = self.fitted()?;
        Ok(fitted
            .trainset
            .to_inner_iid(item)
            .map_or(0.0, |i| fitted.bi[i]))
    }
}

impl<U, I> Algo<U, I> for BaselineBiasModel<U, I>
where
    U: Eq + Hash + Clone + Sync,
    I: Eq + Hash + Clone + Sync,
{
    fn fit(&mut self, ratings: &[Rating<U, I>]) -> Result<()> {
        self.options.validate()?;
        let trainset = Trainset::build(ratings, self.options.rating_scale)?;

        info!(
            "fitting baselines on {} ratings ({} users, {} items), global mean {:.4}",
            trainset.n_ratings(),
            trainset.n_users(),
            trainset.n_items(),
            trainset.global_mean()
        );

        let method = self.options.method;
        let n_epochs = self.options.n_epochs;
        let ts = &trainset;
        let run = move || match method {
            BaselineMethod::Als { reg_u, reg_i } => als(ts, n_epochs, reg_u, reg_i),
            BaselineMethod::Sgd { reg, learning_rate } => sgd(ts, n_epochs, reg, learning_rate),
        };

        let (bu, bi) = match self.options.n_jobs {
            Some(n_jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(n_jobs)
                .build()?
                .install(run),
            None => run(),
        };

        info!("baselines fitted after {} epochs", n_epochs);
        self.fitted = Some(FittedBaselines { trainset, bu, bi });
        Ok(())
    }

    fn estimate(&self, user: &U, item: &I) -> Result<(f64, PredictionDetails)> {
        let fitted = self.fitted()?;
        let uid = fitted.trainset.to_inner_uid(user);
        let iid = fitted.trainset.to_inner_iid(item);

        let mut est = fitted.trainset.global_mean();
        if let Some(u) = uid {
            est += fitted.bu[u];
        }
        if let Some(i) = iid {
            est += fitted.bi[i];
        }

        Ok((
            est,
            PredictionDetails {
                known_user: uid.is_some(),
                known_item: iid.is_some(),
            },
        ))
    }

    fn rating_scale(&self) -> Option<(f64, f64)> {
        self.options.rating_scale
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// Alternating least squares over user then item biases.
///
/// Each phase computes every bias from the other group's values of the previous phase,
/// so users (and items) are independent within a phase and are updated in parallel.
fn als<U: Sync, I: Sync>(
    ts: &Trainset<U, I>,
    n_epochs: usize,
    reg_u: f64,
    reg_i: f64,
) -> (Array1<f64>, Array1<f64>) {
    let global_mean = ts.global_mean();
    let mut bu: Array1<f64> = Array1::zeros(ts.n_users());
    let mut bi: Array1<f64> = Array1::zeros(ts.n_items());

    for epoch in 0..n_epochs {
        bu = ts
            .ur()
            .par_iter()
            .map(|ratings| {
                let dev: f64 = ratings.iter().map(|&(i, r)| r - global_mean - bi[i]).sum();
                dev / (reg_u + ratings.len() as f64)
            })
            .collect::<Vec<f64>>()
            .into();

        bi = ts
            .ir()
            .par_iter()
            .map(|ratings| {
                let dev: f64 = ratings.iter().map(|&(u, r)| r - global_mean - bu[u]).sum();
                dev / (reg_i + ratings.len() as f64)
            })
            .collect::<Vec<f64>>()
            .into();

        log_epoch("als", epoch, n_epochs, ts, &bu, &bi);
    }

    (bu, bi)
}

fn sgd<U, I>(
    ts: &Trainset<U, I>,
    n_epochs: usize,
    reg: f64,
    learning_rate: f64,
) -> (Array1<f64>, Array1<f64>) {
    let global_mean = ts.global_mean();
    let mut bu: Array1<f64> = Array1::zeros(ts.n_users());
    let mut bi: Array1<f64> = Array1::zeros(ts.n_items());

    for epoch in 0..n_epochs {
        for (u, i, r) in ts.all_ratings() {
            let err = r - (global_mean + bu[u] + bi[i]);
            bu[u] += learning_rate * (err - reg * bu[u]);
            bi[i] += learning_rate * (err - reg * bi[i]);
        }

        log_epoch("sgd", epoch, n_epochs, ts, &bu, &bi);
    }

    (bu, bi)
}

fn log_epoch<U, I>(
    method: &str,
    epoch: usize,
    n_epochs: usize,
    ts: &Trainset<U, I>,
    bu: &Array1<f64>,
    bi: &Array1<f64>,
) {
    if !log_enabled!(Level::Debug) {
        return;
    }

    let global_mean = ts.global_mean();
    let (sum_sq, n) = ts
        .all_ratings()
        .fold((0.0, 0usize), |(sum, n), (u, i, r)| {
            (sum + (r - global_mean - bu[u] - bi[i]).powi(2), n + 1)
        });
    debug!(
        "{} epoch {}/{}: training rmse {:.6}",
        method,
        epoch + 1,
        n_epochs,
        (sum_sq / n as f64).sqrt()
    );
}
