//! Analysis payload as delivered by the REST layer
//!
//! Only the numeric fields the engine needs are modelled; everything else in
//! the response is ignored on deserialization.

use crate::error::PnlResult;
use crate::scenario::{ScenarioRequest, StrategyKind, DEFAULT_DAYS_AXIS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInputs {
    pub current_price: f64,
    pub strike: f64,
    pub net_debit: f64,
    #[serde(default)]
    pub max_profit: f64,
    pub strategy: StrategyKind,
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
}

impl AnalysisInputs {
    pub fn from_json(json: &str) -> PnlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Day axis for the chart as seen from `today`
    ///
    /// Without an expiration date the standard checkpoints are used.
    pub fn days_axis(&self, today: NaiveDate) -> Vec<u32> {
        match self.expiration {
            Some(expiration) => days_axis_until(expiration, today),
            None => DEFAULT_DAYS_AXIS.to_vec(),
        }
    }

    pub fn to_request(&self, days_to_expiration: Vec<u32>) -> ScenarioRequest {
        ScenarioRequest {
            current_price: self.current_price,
            strike: self.strike,
            strategy: self.strategy,
            net_debit: self.net_debit,
            max_profit: self.max_profit,
            days_to_expiration,
        }
    }
}

/// Remaining days to `expiration` followed by every standard checkpoint below it
///
/// An expiration on or before `today` collapses to `[0]`.
pub fn days_axis_until(expiration: NaiveDate, today: NaiveDate) -> Vec<u32> {
    let remaining = (expiration - today).num_days().max(0) as u32;
    let mut axis = vec![remaining];
    axis.extend(DEFAULT_DAYS_AXIS.iter().copied().filter(|&d| d < remaining));
    axis
}
