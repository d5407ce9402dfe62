//! P&L surface for heatmap and 3-D rendering
//!
//! Reshapes a [`ScenarioSet`] into a price × time matrix:
//! - X axis: `price_changes` (percent, ascending)
//! - Y axis: `days_to_expiration` (the set's day axis)
//! - Z: `pnl_matrix[[price_index, day_index]]`
//!
//! Row-major flattening of the matrix is exactly the concatenation of every
//! point's `pnl_by_day` in input order.
//!
//! # Metadata modes
//!
//! [`MetadataMode::Unified`] reports interpolated breakevens and the
//! probability-weighted probability of profit, the same definitions as
//! [`crate::metrics::aggregator`]. [`MetadataMode::Legacy`] keeps the older
//! chart definitions: a price change is a breakeven when its P&L is within
//! `near_zero_fraction * |max_profit|` of zero, and probability of profit is
//! the unweighted any-checkpoint win rate.

use crate::error::{PnlError, PnlResult};
use crate::metrics::aggregator::{breakeven_points, probability_of_profit, win_rate};
use crate::scenario::ScenarioSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    #[default]
    Unified,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    /// Checkpoint used for breakevens and probability of profit
    pub day_index: usize,
    pub mode: MetadataMode,
    /// Legacy breakeven threshold as a fraction of |max profit|
    pub near_zero_fraction: f64,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        SurfaceOptions {
            day_index: 0,
            mode: MetadataMode::Unified,
            near_zero_fraction: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceMetadata {
    /// Over the whole matrix
    pub max_profit: f64,
    /// Over the whole matrix
    pub max_loss: f64,
    pub breakevens: Vec<f64>,
    pub probability_of_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlSurface {
    pub price_changes: Vec<f64>,
    pub days_to_expiration: Vec<u32>,
    #[serde(with = "matrix_rows")]
    pub pnl_matrix: Array2<f64>,
    pub metadata: SurfaceMetadata,
}

impl PnlSurface {
    pub fn from_scenarios(set: &ScenarioSet, opts: &SurfaceOptions) -> PnlResult<Self> {
        set.validate()?;
        let rows = set.len();
        let cols = set.days_axis().len();
        let flat: Vec<f64> = set
            .points
            .iter()
            .flat_map(|p| p.pnl_by_day.iter().copied())
            .collect();
        let pnl_matrix =
            Array2::from_shape_vec((rows, cols), flat).map_err(|e| PnlError::InvalidConfiguration {
                field: "pnl_by_day".to_string(),
                reason: e.to_string(),
            })?;

        let (max_profit, max_loss) = if pnl_matrix.is_empty() {
            (0.0, 0.0)
        } else {
            pnl_matrix
                .iter()
                .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &v| {
                    (hi.max(v), lo.min(v))
                })
        };

        let (breakevens, probability_of_profit) = if cols == 0 {
            (Vec::new(), 0.0)
        } else {
            match opts.mode {
                MetadataMode::Unified => (
                    breakeven_points(set, opts.day_index)?,
                    probability_of_profit(set, opts.day_index)?,
                ),
                MetadataMode::Legacy => {
                    let threshold = opts.near_zero_fraction * max_profit.abs();
                    let near_zero = set
                        .column(opts.day_index)?
                        .into_iter()
                        .filter(|&(_, pnl)| pnl.abs() < threshold)
                        .map(|(pct, _)| pct)
                        .collect();
                    (near_zero, win_rate(set))
                }
            }
        };

        Ok(PnlSurface {
            price_changes: set.points.iter().map(|p| p.price_change_percent).collect(),
            days_to_expiration: set.days_to_expiration.clone(),
            pnl_matrix,
            metadata: SurfaceMetadata {
                max_profit,
                max_loss,
                breakevens,
                probability_of_profit,
            },
        })
    }

    /// P&L at `(price_index, day_index)`
    pub fn pnl_at(&self, price_index: usize, day_index: usize) -> Option<f64> {
        self.pnl_matrix.get((price_index, day_index)).copied()
    }

    /// Matrix as nested rows, one per price change
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.pnl_matrix.outer_iter().map(|row| row.to_vec()).collect()
    }

    pub fn to_json(&self) -> PnlResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serialize a matrix as `[[row0...], [row1...]]`
mod matrix_rows {
    use ndarray::Array2;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(m: &Array2<f64>, s: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = m.outer_iter().map(|r| r.to_vec()).collect();
        rows.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Array2<f64>, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(d)?;
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(D::Error::custom("pnl matrix rows have different lengths"));
        }
        let nrows = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((nrows, ncols), flat).map_err(D::Error::custom)
    }
}
