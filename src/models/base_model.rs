use crate::error::{BaselineError, Result};
use crate::utils::trainset::Rating;

/// What the model knew when it produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionDetails {
    pub known_user: bool,
    pub known_item: bool,
}

/// A single rating prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction<U, I> {
    pub uid: U,
    pub iid: I,
    /// True rating, when the prediction was made against a test triple.
    pub r_ui: Option<f64>,
    pub est: f64,
    pub details: PredictionDetails,
}

/// A common Rust trait for rating predictors.
pub trait Algo<U, I> {
    /// Fit on a training set, replacing anything fitted before.
    fn fit(&mut self, ratings: &[Rating<U, I>]) -> Result<()>;

    /// Raw, unclipped estimate for one (user, item) pair.
    fn estimate(&self, user: &U, item: &I) -> Result<(f64, PredictionDetails)>;

    /// Bounds to clip estimates to, if any.
    fn rating_scale(&self) -> Option<(f64, f64)>;

    fn is_fitted(&self) -> bool;

    /// Default: estimate, then clip to the rating scale.
    fn predict(&self, user: &U, item: &I, r_ui: Option<f64>, clip: bool) -> Result<Prediction<U, I>>
    where
        U: Clone,
        I: Clone,
    {
        let (mut est, details) = self.estimate(user, item)?;
        if clip {
            if let Some((lower, upper)) = self.rating_scale() {
                est = est.clamp(lower, upper);
            }
        }
        Ok(Prediction {
            uid: user.clone(),
            iid: item.clone(),
            r_ui,
            est,
            details,
        })
    }

    /// Default: predict every triple of a test set, keeping the true rating.
    fn test(&self, testset: &[Rating<U, I>]) -> Result<Vec<Prediction<U, I>>>
    where
        U: Clone,
        I: Clone,
    {
        if !self.is_fitted() {
            return Err(BaselineError::NotFitted);
        }
        testset
            .iter()
            .map(|r| self.predict(&r.user, &r.item, Some(r.value), true))
            .collect()
    }
}
