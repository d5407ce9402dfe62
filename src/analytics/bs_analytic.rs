//! Closed-form Black-Scholes Greeks for the strategy dashboards
//!
//! # Mathematical Foundation
//!
//! ```text
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//!
//! Φ is the Abramowitz–Stegun approximation from [`crate::math_utils`] and φ
//! is the standard normal density.
//!
//! # Call-equivalent display
//!
//! [`compute_greeks`] is the call formula and is used as an illustrative
//! sensitivity display for every strategy, including calendars and
//! straddles. Use [`compute_greeks_for`] when the leg type is known.
//!
//! Nothing here validates inputs: `T = 0` or `σ = 0` yield NaN/∞ following
//! IEEE-754. Callers that sweep to expiration go through
//! [`crate::analytics::greeks_series`], which clamps `T`.

use crate::math_utils::{norm_cdf, norm_pdf};
use serde::{Deserialize, Serialize};

/// Option leg type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[default]
    Call,
    Put,
}

/// First-order option sensitivities
///
/// - `theta` is per year; see [`Greeks::theta_per_day`]
/// - `vega` is per 1 volatility point (σ + 0.01)
/// - `rho` is per 1 rate point (r + 0.01)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    /// Theta expressed per calendar day
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }

    /// True when every sensitivity is a finite number
    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.theta.is_finite()
            && self.vega.is_finite()
            && self.rho.is_finite()
    }
}

fn d1_d2(spot: f64, strike: f64, t: f64, sigma: f64, r: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((spot / strike).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Call Greeks for a single `(spot, strike, T, σ, r)` point
///
/// # Formula
/// ```text
/// Δ = Φ(d₁)
/// Γ = φ(d₁) / (S σ √T)
/// Θ = -S φ(d₁) σ / (2√T) - r K e^(-rT) Φ(d₂)
/// ν = S φ(d₁) √T / 100
/// ρ = K T e^(-rT) Φ(d₂) / 100
/// ```
///
/// # Parameters
/// - `spot`: Underlying price (> 0)
/// - `strike`: Strike price (> 0)
/// - `time_to_expiry_years`: Time to expiration in years (≥ 0)
/// - `volatility`: Annualized volatility (> 0)
/// - `risk_free_rate`: Continuously compounded rate
pub fn compute_greeks(
    spot: f64,
    strike: f64,
    time_to_expiry_years: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> Greeks {
    compute_greeks_for(
        OptionKind::Call,
        spot,
        strike,
        time_to_expiry_years,
        volatility,
        risk_free_rate,
    )
}

/// Greeks for a call or a put
///
/// Put relations:
/// ```text
/// Δ = Φ(d₁) - 1
/// Θ = -S φ(d₁) σ / (2√T) + r K e^(-rT) Φ(-d₂)
/// ρ = -K T e^(-rT) Φ(-d₂) / 100
/// ```
/// Gamma and vega are shared by both legs.
pub fn compute_greeks_for(
    kind: OptionKind,
    spot: f64,
    strike: f64,
    time_to_expiry_years: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> Greeks {
    let t = time_to_expiry_years;
    let r = risk_free_rate;
    let (d1, d2) = d1_d2(spot, strike, t, volatility, r);
    let sqrt_t = t.sqrt();
    let pdf_d1 = norm_pdf(d1);
    let discount = (-r * t).exp();

    let gamma = pdf_d1 / (spot * volatility * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t / 100.0;
    let decay = -spot * pdf_d1 * volatility / (2.0 * sqrt_t);

    match kind {
        OptionKind::Call => Greeks {
            delta: norm_cdf(d1),
            gamma,
            theta: decay - r * strike * discount * norm_cdf(d2),
            vega,
            rho: strike * t * discount * norm_cdf(d2) / 100.0,
        },
        OptionKind::Put => Greeks {
            delta: norm_cdf(d1) - 1.0,
            gamma,
            theta: decay + r * strike * discount * norm_cdf(-d2),
            vega,
            rho: -strike * t * discount * norm_cdf(-d2) / 100.0,
        },
    }
}

/// Black-Scholes European option price
///
/// ```text
/// C = S Φ(d₁) - K e^(-rT) Φ(d₂)
/// P = K e^(-rT) Φ(-d₂) - S Φ(-d₁)
/// ```
pub fn bs_price(
    kind: OptionKind,
    spot: f64,
    strike: f64,
    time_to_expiry_years: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> f64 {
    let t = time_to_expiry_years;
    let (d1, d2) = d1_d2(spot, strike, t, volatility, risk_free_rate);
    let discounted_strike = strike * (-risk_free_rate * t).exp();
    match kind {
        OptionKind::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionKind::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}
