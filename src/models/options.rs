use crate::error::{BaselineError, Result};

/// How the baselines are estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaselineMethod {
    /// Alternating least squares with separate user and item regularization.
    Als { reg_u: f64, reg_i: f64 },
    /// Stochastic gradient descent over every observation.
    Sgd { reg: f64, learning_rate: f64 },
}

/// Options for `BaselineBiasModel`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineOptions {
    pub method: BaselineMethod,
    pub n_epochs: usize,
    /// Predictions are clipped to `[lower, upper]` when set. This includes cold-start
    /// predictions, so a global mean outside the scale is clipped too; use
    /// `without_clipping` when training ratings are not on this scale.
    pub rating_scale: Option<(f64, f64)>,
    /// Size of a dedicated rayon pool for fitting; `None` uses the global pool.
    pub n_jobs: Option<usize>,
}

impl Default for BaselineOptions {
    fn default() -> Self {
        BaselineOptions::als(10, 15.0, 10.0)
    }
}

impl BaselineOptions {
    pub fn als(n_epochs: usize, reg_u: f64, reg_i: f64) -> Self {
        BaselineOptions {
            method: BaselineMethod::Als { reg_u, reg_i },
            n_epochs,
            rating_scale: Some((1.0, 5.0)),
            n_jobs: None,
        }
    }

    pub fn sgd(n_epochs: usize, reg: f64, learning_rate: f64) -> Self {
        BaselineOptions {
            method: BaselineMethod::Sgd { reg, learning_rate },
            n_epochs,
            rating_scale: Some((1.0, 5.0)),
            n_jobs: None,
        }
    }

    pub fn with_rating_scale(mut self, lower: f64, upper: f64) -> Self {
        self.rating_scale = Some((lower, upper));
        self
    }

    pub fn without_clipping(mut self) -> Self {
        self.rating_scale = None;
        self
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_epochs == 0 {
            return Err(BaselineError::hyperparameter(
                "n_epochs",
                self.n_epochs,
                "must be at least 1",
            ));
        }

        match self.method {
            BaselineMethod::Als { reg_u, reg_i } => {
                non_negative("reg_u", reg_u)?;
                non_negative("reg_i", reg_i)?;
            }
            BaselineMethod::Sgd { reg, learning_rate } => {
                non_negative("reg", reg)?;
                if !(learning_rate.is_finite() && learning_rate > 0.0) {
                    return Err(BaselineError::hyperparameter(
                        "learning_rate",
                        learning_rate,
                        "must be positive and finite",
                    ));
                }
            }
        }

        if let Some((lower, upper)) = self.rating_scale {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(BaselineError::hyperparameter(
                    "rating_scale",
                    format!("({lower}, {upper})"),
                    "must be finite with lower < upper",
                ));
            }
        }

        if self.n_jobs == Some(0) {
            return Err(BaselineError::hyperparameter(
                "n_jobs",
                0,
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn non_negative(param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BaselineError::hyperparameter(
            param,
            value,
            "must be non-negative and finite",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = BaselineOptions::default();
        assert_eq!(options.method, BaselineMethod::Als { reg_u: 15.0, reg_i: 10.0 });
        assert_eq!(options.n_epochs, 10);
        assert!(options.validate().is_ok());
        assert!(BaselineOptions::sgd(20, 0.02, 0.005).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            BaselineOptions::als(0, 5.0, 3.0),
            BaselineOptions::als(25, -1.0, 3.0),
            BaselineOptions::als(25, 5.0, f64::NAN),
            BaselineOptions::sgd(20, 0.02, 0.0),
            BaselineOptions::als(25, 5.0, 3.0).with_rating_scale(5.0, 1.0),
            BaselineOptions::als(25, 5.0, 3.0).with_n_jobs(0),
        ];
        for options in bad {
            assert!(
                matches!(
                    options.validate(),
                    Err(BaselineError::InvalidHyperparameter { .. })
                ),
                "{options:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_regularization_is_allowed() {
        assert!(BaselineOptions::als(1, 0.0, 0.0).validate().is_ok());
    }
}
