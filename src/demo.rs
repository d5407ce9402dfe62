//! Synthetic analysis payloads for offline and demo mode
//!
//! Produces [`AnalysisInputs`] shaped like the analysis API response when no
//! network is available. Premiums are priced with the closed-form
//! Black-Scholes model so the demo charts look plausible; the draws
//! themselves carry no meaning and are outside the engine's numerical
//! contract. Output is reproducible for a given seed and index.

use crate::analytics::bs_analytic::{bs_price, OptionKind};
use crate::error::{validation::*, PnlError, PnlResult};
use crate::payload::AnalysisInputs;
use crate::rng::RngFactory;
use crate::scenario::{CalendarSpread, StrategyKind};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};

const EXPIRY_CHOICES: [i64; 6] = [7, 14, 21, 30, 45, 60];
// back month of a demo calendar sits this many days after the front
const CALENDAR_GAP_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoPayload {
    pub inputs: AnalysisInputs,
    pub implied_volatility: f64,
    pub risk_free_rate: f64,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct DemoPayloadGenerator {
    factory: RngFactory,
    today: NaiveDate,
    risk_free_rate: f64,
    spot_distribution: LogNormal<f64>,
}

impl DemoPayloadGenerator {
    pub fn new(seed: u64, today: NaiveDate) -> PnlResult<Self> {
        Self::with_rate(seed, today, 0.045)
    }

    pub fn with_rate(seed: u64, today: NaiveDate, risk_free_rate: f64) -> PnlResult<Self> {
        validate_finite("risk_free_rate", risk_free_rate)?;
        // median spot 150, wide dispersion across tickers
        let spot_distribution =
            LogNormal::new(150f64.ln(), 0.6).map_err(|e| PnlError::InvalidConfiguration {
                field: "spot_distribution".to_string(),
                reason: e.to_string(),
            })?;
        Ok(DemoPayloadGenerator {
            factory: RngFactory::new(seed),
            today,
            risk_free_rate,
            spot_distribution,
        })
    }

    /// Payload number `index` of this generator's sequence
    pub fn payload(&self, index: u64) -> DemoPayload {
        let mut rng = self.factory.stream(index);

        let spot = self.spot_distribution.sample(&mut rng).clamp(5.0, 5_000.0);
        let current_price = round_cents(spot);
        let strike = round_to_increment(spot);
        let implied_volatility = rng.gen_range(0.15..0.6);
        let days = EXPIRY_CHOICES[rng.gen_range(0..EXPIRY_CHOICES.len())];
        let strategy = if rng.gen_bool(0.5) {
            StrategyKind::Calendar
        } else {
            StrategyKind::Straddle
        };

        let r = self.risk_free_rate;
        let front = days as f64 / 365.0;
        let (net_debit, max_profit) = match strategy {
            StrategyKind::Straddle => {
                let debit = bs_price(OptionKind::Call, spot, strike, front, implied_volatility, r)
                    + bs_price(OptionKind::Put, spot, strike, front, implied_volatility, r);
                (round_cents(debit), round_cents(debit))
            }
            StrategyKind::Calendar => {
                let back = (days + CALENDAR_GAP_DAYS) as f64 / 365.0;
                let debit = bs_price(OptionKind::Call, spot, strike, back, implied_volatility, r)
                    - bs_price(OptionKind::Call, spot, strike, front, implied_volatility, r);
                let debit = round_cents(debit);
                let cap = CalendarSpread::new(strike, debit, 0.0).profit_cap().max(0.0);
                (debit, round_cents(cap))
            }
        };

        DemoPayload {
            inputs: AnalysisInputs {
                current_price,
                strike,
                net_debit,
                max_profit,
                strategy,
                expiration: Some(self.today + Duration::days(days)),
            },
            implied_volatility,
            risk_free_rate: r,
            as_of: self.today,
        }
    }

    pub fn batch(&self, count: usize) -> Vec<DemoPayload> {
        (0..count as u64).map(|i| self.payload(i)).collect()
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Listed strikes: 0.5 below 25, 1 below 200, 5 above
fn round_to_increment(spot: f64) -> f64 {
    let increment = if spot < 25.0 {
        0.5
    } else if spot < 200.0 {
        1.0
    } else {
        5.0
    };
    (spot / increment).round() * increment
}
