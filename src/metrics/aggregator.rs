//! Summary statistics over a scenario grid
//!
//! All functions are single-pass reductions over a [`ScenarioSet`]. Those that
//! look at one checkpoint take a `day_index` into the set's day axis and fail
//! with [`PnlError::DayIndexOutOfRange`] when it does not exist, or with
//! [`PnlError::InvalidConfiguration`] when a point's `pnl_by_day` does not
//! match the axis.
//!
//! Two notions of "profitable" coexist:
//! - [`probability_of_profit`]: probability-weighted share of price offsets
//!   with positive P&L at one checkpoint
//! - [`win_rate`]: unweighted share of price offsets where any checkpoint is
//!   positive

use crate::error::{PnlError, PnlResult};
use crate::scenario::ScenarioSet;
use serde::{Deserialize, Serialize};

/// Largest P&L at the checkpoint
pub fn max_profit(set: &ScenarioSet, day_index: usize) -> PnlResult<f64> {
    set.check_day_index(day_index)?;
    Ok(set
        .points
        .iter()
        .map(|p| p.pnl_by_day[day_index])
        .fold(f64::NEG_INFINITY, f64::max))
}

/// Smallest P&L at the checkpoint
pub fn max_loss(set: &ScenarioSet, day_index: usize) -> PnlResult<f64> {
    set.check_day_index(day_index)?;
    Ok(set
        .points
        .iter()
        .map(|p| p.pnl_by_day[day_index])
        .fold(f64::INFINITY, f64::min))
}

/// Zero crossings of a `(price_change, pnl)` curve ordered by price change
///
/// A crossing is an adjacent pair going from `<= 0` to `> 0` or from `> 0` to
/// `<= 0`; its location is linearly interpolated:
/// ```text
/// x* = x₀ + (0 - y₀) (x₁ - x₀) / (y₁ - y₀)
/// ```
pub fn interpolate_breakevens(curve: &[(f64, f64)]) -> Vec<f64> {
    curve
        .windows(2)
        .filter_map(|pair| {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            let crosses = (y0 <= 0.0 && y1 > 0.0) || (y0 > 0.0 && y1 <= 0.0);
            crosses.then(|| x0 + (0.0 - y0) * (x1 - x0) / (y1 - y0))
        })
        .collect()
}

/// Interpolated breakeven price changes (percent), ascending
pub fn breakeven_points(set: &ScenarioSet, day_index: usize) -> PnlResult<Vec<f64>> {
    Ok(interpolate_breakevens(&set.column(day_index)?))
}

/// Probability-weighted share of price offsets with positive P&L
///
/// Weights are normalised by their sum, so the result does not depend on
/// their scale. Returns 0 when every weight is zero.
pub fn probability_of_profit(set: &ScenarioSet, day_index: usize) -> PnlResult<f64> {
    set.check_day_index(day_index)?;
    let (profitable, total) = set.points.iter().fold((0.0, 0.0), |(win, all), p| {
        let w = p.probability_weight;
        if p.pnl_by_day[day_index] > 0.0 {
            (win + w, all + w)
        } else {
            (win, all + w)
        }
    });
    Ok(if total > 0.0 { profitable / total } else { 0.0 })
}

/// Share of price offsets where any checkpoint shows a profit, unweighted
pub fn win_rate(set: &ScenarioSet) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let winners = set
        .points
        .iter()
        .filter(|p| p.pnl_by_day.iter().any(|&pnl| pnl > 0.0))
        .count();
    winners as f64 / set.len() as f64
}

/// Probability-weighted mean P&L at the checkpoint
pub fn expected_pnl(set: &ScenarioSet, day_index: usize) -> PnlResult<f64> {
    set.check_day_index(day_index)?;
    let (weighted, total) = set.points.iter().fold((0.0, 0.0), |(acc, all), p| {
        (
            acc + p.probability_weight * p.pnl_by_day[day_index],
            all + p.probability_weight,
        )
    });
    Ok(if total > 0.0 { weighted / total } else { 0.0 })
}

/// Display labels for a day axis; an empty axis falls back to expiration only
pub fn time_frame_labels(days_axis: &[u32]) -> Vec<String> {
    if days_axis.is_empty() {
        return vec!["At Expiration".to_string()];
    }
    days_axis
        .iter()
        .map(|&days| match days {
            0 => "At Expiration".to_string(),
            1 => "1 Day".to_string(),
            n => format!("{} Days", n),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakeven {
    pub price_change_percent: f64,
    pub price: f64,
}

/// Every headline statistic for one checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub day_index: usize,
    pub days_to_expiration: u32,
    pub max_profit: f64,
    pub max_loss: f64,
    pub breakevens: Vec<Breakeven>,
    pub probability_of_profit: f64,
    pub win_rate: f64,
    pub expected_pnl: f64,
}

impl ScenarioSummary {
    pub fn compute(set: &ScenarioSet, day_index: usize) -> PnlResult<Self> {
        set.check_day_index(day_index)?;
        if set.is_empty() {
            return Err(PnlError::InvalidConfiguration {
                field: "points".to_string(),
                reason: "scenario set has no price points".to_string(),
            });
        }

        let breakevens = breakeven_points(set, day_index)?
            .into_iter()
            .map(|pct| Breakeven {
                price_change_percent: pct,
                price: set.current_price * (1.0 + pct / 100.0),
            })
            .collect();

        Ok(ScenarioSummary {
            day_index,
            days_to_expiration: set.days_to_expiration[day_index],
            max_profit: max_profit(set, day_index)?,
            max_loss: max_loss(set, day_index)?,
            breakevens,
            probability_of_profit: probability_of_profit(set, day_index)?,
            win_rate: win_rate(set),
            expected_pnl: expected_pnl(set, day_index)?,
        })
    }
}
