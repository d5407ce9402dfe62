//! Strategy Payoff Models
//!
//! # Definitions
//!
//! Each model maps an underlying price and a day-count checkpoint to an
//! approximate position P&L. They do not price options; they are the
//! simplified value curves the dashboards plot.
//!
//! ## Calendar spread
//! - **Expiration** (`days == 0`): `min(max(0, |S-K|) - D, cap)` with
//!   `cap = K*0.05 - D`, lowered to `max_profit` when that is positive, finite
//!   and smaller; `max_profit <= 0` leaves the plain `K*0.05 - D` cap
//! - **Before expiration**: `tv = min(days/30, 1)`; within 5% of strike the
//!   P&L is `cap * (1 - tv)`, elsewhere `-D * (1 - tv)`
//!
//! ## Straddle
//! Time independent. With `move = |S-K|` and `band = K*0.15`:
//! - `move > band`: `-(move - band)`
//! - otherwise: `D * (1 - move/band)`
//!
//! New strategies implement [`PositionModel`]; the scenario engine is generic
//! over it, so [`Strategy`] only collects the built-in ones.

use crate::error::PnlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anything that can value a position at a price and checkpoint
pub trait PositionModel {
    fn name(&self) -> &'static str;

    /// Approximate P&L at `price` with `days_to_expiration` remaining
    fn pnl(&self, price: f64, days_to_expiration: u32) -> f64;
}

/// Built-in strategy identifiers, as sent by the analysis API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Calendar,
    Straddle,
}

impl FromStr for StrategyKind {
    type Err = PnlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(StrategyKind::Calendar),
            "straddle" => Ok(StrategyKind::Straddle),
            _ => Err(PnlError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Calendar => write!(f, "calendar"),
            StrategyKind::Straddle => write!(f, "straddle"),
        }
    }
}

/// Calendar spread value model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarSpread {
    pub strike: f64,
    pub net_debit: f64,
    /// Extra ceiling on profit; ignored unless positive and finite
    pub max_profit: f64,
    /// Ceiling as a fraction of strike (0.05)
    pub cap_ratio: f64,
    /// Distance from strike, as a fraction of strike, counted as "near" (0.05)
    pub near_strike_band: f64,
    /// Day count at which time value saturates (30)
    pub reference_days: f64,
}

impl CalendarSpread {
    pub fn new(strike: f64, net_debit: f64, max_profit: f64) -> Self {
        CalendarSpread {
            strike,
            net_debit,
            max_profit,
            cap_ratio: 0.05,
            near_strike_band: 0.05,
            reference_days: 30.0,
        }
    }

    /// Best-case P&L of the spread
    pub fn profit_cap(&self) -> f64 {
        let cap = self.strike * self.cap_ratio - self.net_debit;
        if self.max_profit.is_finite() && self.max_profit > 0.0 {
            cap.min(self.max_profit)
        } else {
            cap
        }
    }
}

impl PositionModel for CalendarSpread {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn pnl(&self, price: f64, days_to_expiration: u32) -> f64 {
        let cap = self.profit_cap();
        if days_to_expiration == 0 {
            let intrinsic = (price - self.strike).abs().max(0.0);
            return (intrinsic - self.net_debit).min(cap);
        }

        let time_value = (days_to_expiration as f64 / self.reference_days).min(1.0);
        let elapsed = 1.0 - time_value;
        let distance = (price - self.strike).abs() / self.strike;
        if distance <= self.near_strike_band {
            cap * elapsed
        } else {
            -self.net_debit * elapsed
        }
    }
}

/// Straddle value model with a fixed breakeven band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Straddle {
    pub strike: f64,
    pub net_debit: f64,
    /// Breakeven band as a fraction of strike (0.15)
    pub band_ratio: f64,
}

impl Straddle {
    pub fn new(strike: f64, net_debit: f64) -> Self {
        Straddle {
            strike,
            net_debit,
            band_ratio: 0.15,
        }
    }
}

impl PositionModel for Straddle {
    fn name(&self) -> &'static str {
        "straddle"
    }

    fn pnl(&self, price: f64, _days_to_expiration: u32) -> f64 {
        let band = self.strike * self.band_ratio;
        let movement = (price - self.strike).abs();
        if movement > band {
            -(movement - band)
        } else {
            self.net_debit * (1.0 - movement / band)
        }
    }
}

/// Built-in strategies with their parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Strategy {
    Calendar(CalendarSpread),
    Straddle(Straddle),
}

impl Strategy {
    pub fn from_kind(kind: StrategyKind, strike: f64, net_debit: f64, max_profit: f64) -> Self {
        match kind {
            StrategyKind::Calendar => {
                Strategy::Calendar(CalendarSpread::new(strike, net_debit, max_profit))
            }
            StrategyKind::Straddle => Strategy::Straddle(Straddle::new(strike, net_debit)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Calendar(_) => StrategyKind::Calendar,
            Strategy::Straddle(_) => StrategyKind::Straddle,
        }
    }
}

impl PositionModel for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Calendar(c) => c.name(),
            Strategy::Straddle(s) => s.name(),
        }
    }

    fn pnl(&self, price: f64, days_to_expiration: u32) -> f64 {
        match self {
            Strategy::Calendar(c) => c.pnl(price, days_to_expiration),
            Strategy::Straddle(s) => s.pnl(price, days_to_expiration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calendar_expiration_formula() {
        let cal = CalendarSpread::new(100.0, 2.5, 1_000.0);
        let expected = |p: f64| ((p - 100.0_f64).abs() - 2.5).min(100.0 * 0.05 - 2.5);
        for &price in &[100.0, 105.0, 80.0] {
            assert_relative_eq!(cal.pnl(price, 0), expected(price));
        }
        assert_relative_eq!(cal.pnl(100.0, 0), -2.5);
        assert_relative_eq!(cal.pnl(80.0, 0), 2.5);
    }

    #[test]
    fn test_calendar_cap_respects_max_profit() {
        let cal = CalendarSpread::new(200.0, 2.0, 5.0);
        // strike cap would be 8.0
        assert_relative_eq!(cal.profit_cap(), 5.0);
        let uncapped = CalendarSpread::new(200.0, 2.0, 0.0);
        assert_relative_eq!(uncapped.profit_cap(), 8.0);
    }

    #[test]
    fn test_calendar_time_decay() {
        let cal = CalendarSpread::new(100.0, 2.5, 7.5);
        // near strike: cap * (1 - 15/30)
        assert_relative_eq!(cal.pnl(102.0, 15), 2.5 * 0.5);
        // far from strike: -debit * (1 - 15/30)
        assert_relative_eq!(cal.pnl(120.0, 15), -1.25);
        // beyond the reference horizon the time value saturates
        assert_relative_eq!(cal.pnl(120.0, 45), 0.0);
    }

    #[test]
    fn test_straddle_band() {
        let s = Straddle::new(100.0, 4.0);
        assert_relative_eq!(s.pnl(100.0, 10), 4.0);
        assert_relative_eq!(s.pnl(107.5, 10), 2.0);
        assert_relative_eq!(s.pnl(115.0, 0), 0.0);
        assert_relative_eq!(s.pnl(80.0, 0), -5.0);
        assert_relative_eq!(s.pnl(80.0, 30), s.pnl(80.0, 0));
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("calendar".parse::<StrategyKind>().unwrap(), StrategyKind::Calendar);
        assert_eq!(" Straddle ".parse::<StrategyKind>().unwrap(), StrategyKind::Straddle);
        assert!(matches!(
            "iron_condor".parse::<StrategyKind>(),
            Err(PnlError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_dispatch() {
        let strategy = Strategy::from_kind(StrategyKind::Straddle, 100.0, 4.0, 0.0);
        assert_eq!(strategy.kind(), StrategyKind::Straddle);
        assert_eq!(strategy.name(), "straddle");
        assert_relative_eq!(strategy.pnl(100.0, 5), 4.0);
    }
}
