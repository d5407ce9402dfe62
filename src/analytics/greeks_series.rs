//! Greeks sweeps for the sensitivity charts
//!
//! Two sweeps are provided: across underlying prices at a fixed day count
//! ([`greeks_series`]) and across a day axis at a fixed spot
//! ([`greeks_decay`]). Both clamp the time to expiry to
//! [`GreeksSeriesConfig::min_time_years`] so the expiration point stays finite.

use crate::analytics::bs_analytic::{compute_greeks_for, OptionKind};
use crate::error::{validation::*, PnlError, PnlResult};
use serde::{Deserialize, Serialize};

/// One hour of a 365-day year
pub const DEFAULT_MIN_TIME_YEARS: f64 = 1.0 / (365.0 * 24.0);

/// One row of a Greeks series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreeksPoint {
    pub underlying_price: f64,
    pub days_to_expiration: u32,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeksSeriesConfig {
    pub spot: f64,
    pub strike: f64,
    pub days_to_expiration: u32,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub kind: OptionKind,
    /// Sweep bounds as fractions of spot, e.g. -0.2..=0.2
    pub min_change: f64,
    pub max_change: f64,
    pub points: usize,
    pub min_time_years: f64,
}

impl Default for GreeksSeriesConfig {
    fn default() -> Self {
        GreeksSeriesConfig {
            spot: 100.0,
            strike: 100.0,
            days_to_expiration: 30,
            volatility: 0.2,
            risk_free_rate: 0.05,
            kind: OptionKind::Call,
            min_change: -0.2,
            max_change: 0.2,
            points: 41,
            min_time_years: DEFAULT_MIN_TIME_YEARS,
        }
    }
}

impl GreeksSeriesConfig {
    pub fn validate(&self) -> PnlResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_positive("volatility", self.volatility)?;
        validate_finite("volatility", self.volatility)?;
        validate_finite("risk_free_rate", self.risk_free_rate)?;
        validate_positive("min_time_years", self.min_time_years)?;
        validate_finite("min_time_years", self.min_time_years)?;
        validate_finite("min_change", self.min_change)?;
        validate_finite("max_change", self.max_change)?;
        if self.min_change <= -1.0 {
            return Err(PnlError::InvalidParameters {
                parameter: "min_change".to_string(),
                value: self.min_change,
                constraint: "must be greater than -1 (prices stay positive)".to_string(),
            });
        }
        if self.min_change > self.max_change {
            return Err(PnlError::InvalidConfiguration {
                field: "min_change".to_string(),
                reason: format!(
                    "lower bound {} exceeds upper bound {}",
                    self.min_change, self.max_change
                ),
            });
        }
        if self.points == 0 {
            return Err(PnlError::InvalidConfiguration {
                field: "points".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn time_years(&self, days: u32) -> f64 {
        let raw = days as f64 / 365.0;
        if raw < self.min_time_years {
            tracing::debug!(days, clamped = self.min_time_years, "clamping time to expiry");
            self.min_time_years
        } else {
            raw
        }
    }

    fn point(&self, price: f64, days: u32) -> GreeksPoint {
        let g = compute_greeks_for(
            self.kind,
            price,
            self.strike,
            self.time_years(days),
            self.volatility,
            self.risk_free_rate,
        );
        GreeksPoint {
            underlying_price: price,
            days_to_expiration: days,
            delta: g.delta,
            gamma: g.gamma,
            theta: g.theta,
            vega: g.vega,
            rho: g.rho,
        }
    }
}

impl GreeksPoint {
    /// Theta per calendar day (theta / 365)
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }
}

/// Sweep underlying prices at the configured day count
///
/// Prices run evenly from `spot * (1 + min_change)` to
/// `spot * (1 + max_change)`; a single point sits at the lower bound.
pub fn greeks_series(cfg: &GreeksSeriesConfig) -> PnlResult<Vec<GreeksPoint>> {
    cfg.validate()?;
    if cfg.days_to_expiration == 0 {
        tracing::warn!(
            min_time_years = cfg.min_time_years,
            "greeks series requested at expiration; time to expiry clamped"
        );
    }

    let lo = cfg.spot * (1.0 + cfg.min_change);
    let hi = cfg.spot * (1.0 + cfg.max_change);
    let step = if cfg.points > 1 {
        (hi - lo) / (cfg.points - 1) as f64
    } else {
        0.0
    };

    Ok((0..cfg.points)
        .map(|i| cfg.point(lo + step * i as f64, cfg.days_to_expiration))
        .collect())
}

/// Sweep a day axis at the configured spot
pub fn greeks_decay(cfg: &GreeksSeriesConfig, days_axis: &[u32]) -> PnlResult<Vec<GreeksPoint>> {
    cfg.validate()?;
    Ok(days_axis
        .iter()
        .map(|&days| cfg.point(cfg.spot, days))
        .collect())
}
