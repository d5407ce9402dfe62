//! Probability weights for the scenario grid
//!
//! Each price offset gets the standard normal density of its move measured
//! in horizon standard deviations:
//! ```text
//! σ_h = σ_annual * √(horizon_days / 365)
//! z   = (pct / 100) / σ_h
//! w   = φ(z)
//! ```
//! The density is evaluated at a single point (no bucket integration) and the
//! weights are not normalised. The volatility and horizon are fixed by
//! configuration and do not follow the strategy's implied volatility or the
//! requested day axis.

use crate::error::{validation::*, PnlError, PnlResult};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityConfig {
    /// Annualized volatility assumed for every strategy (0.20)
    pub annual_volatility: f64,
    /// Horizon the weights describe, in days (30)
    pub horizon_days: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        ProbabilityConfig {
            annual_volatility: 0.2,
            horizon_days: 30.0,
        }
    }
}

impl ProbabilityConfig {
    pub fn validate(&self) -> PnlResult<()> {
        validate_positive("annual_volatility", self.annual_volatility)?;
        validate_finite("annual_volatility", self.annual_volatility)?;
        validate_positive("horizon_days", self.horizon_days)?;
        validate_finite("horizon_days", self.horizon_days)
    }

    /// Standard deviation of the move over the horizon
    pub fn horizon_volatility(&self) -> f64 {
        self.annual_volatility * (self.horizon_days / 365.0).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    normal: Normal,
    horizon_vol: f64,
}

impl ProbabilityModel {
    pub fn new(cfg: &ProbabilityConfig) -> PnlResult<Self> {
        cfg.validate()?;
        let normal = Normal::new(0.0, 1.0).map_err(|e| PnlError::InvalidConfiguration {
            field: "probability".to_string(),
            reason: e.to_string(),
        })?;
        Ok(ProbabilityModel {
            normal,
            horizon_vol: cfg.horizon_volatility(),
        })
    }

    /// Weight of a signed percentage move, in `[0, φ(0)]`
    pub fn weight(&self, price_change_percent: f64) -> f64 {
        let z = price_change_percent / 100.0 / self.horizon_vol;
        self.normal.pdf(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weight_symmetric_and_peaked() {
        let model = ProbabilityModel::new(&ProbabilityConfig::default()).unwrap();
        assert_relative_eq!(model.weight(10.0), model.weight(-10.0), epsilon = 1e-15);
        assert!(model.weight(0.0) > model.weight(4.0));
        assert!(model.weight(4.0) > model.weight(20.0));
        assert!(model.weight(0.0) <= 1.0);
        assert!(model.weight(30.0) >= 0.0);
    }

    #[test]
    fn test_weight_matches_density() {
        let cfg = ProbabilityConfig::default();
        let model = ProbabilityModel::new(&cfg).unwrap();
        let z = 0.06 / cfg.horizon_volatility();
        assert_relative_eq!(
            model.weight(6.0),
            crate::math_utils::norm_pdf(z),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_non_positive_volatility() {
        let cfg = ProbabilityConfig {
            annual_volatility: 0.0,
            ..Default::default()
        };
        assert!(ProbabilityModel::new(&cfg).is_err());
    }
}
