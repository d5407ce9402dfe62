// src/scenario/engine.rs
use crate::error::{validation::*, PnlError, PnlResult};
use crate::scenario::payoffs::{PositionModel, Strategy, StrategyKind};
use crate::scenario::probability::{ProbabilityConfig, ProbabilityModel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Checkpoints used by the dashboards when none are supplied
pub const DEFAULT_DAYS_AXIS: [u32; 7] = [30, 21, 14, 7, 3, 1, 0];

/// Largest number of price points a grid may request
pub const MAX_GRID_POINTS: usize = 10_000;

/// Price axis of the scenario grid, in percent of spot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub min_change_percent: f64,
    pub max_change_percent: f64,
    pub step_percent: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            min_change_percent: -30.0,
            max_change_percent: 30.0,
            step_percent: 2.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> PnlResult<()> {
        validate_finite("min_change_percent", self.min_change_percent)?;
        validate_finite("max_change_percent", self.max_change_percent)?;
        validate_positive("step_percent", self.step_percent)?;
        validate_finite("step_percent", self.step_percent)?;

        if self.min_change_percent <= -100.0 {
            return Err(PnlError::InvalidParameters {
                parameter: "min_change_percent".to_string(),
                value: self.min_change_percent,
                constraint: "must be greater than -100 (prices stay positive)".to_string(),
            });
        }
        if self.min_change_percent > self.max_change_percent {
            return Err(PnlError::InvalidConfiguration {
                field: "grid".to_string(),
                reason: format!(
                    "min_change_percent {} exceeds max_change_percent {}",
                    self.min_change_percent, self.max_change_percent
                ),
            });
        }
        let span = (self.max_change_percent - self.min_change_percent) / self.step_percent;
        if !span.is_finite() || span + 1.0 > MAX_GRID_POINTS as f64 {
            return Err(PnlError::InvalidConfiguration {
                field: "grid".to_string(),
                reason: format!(
                    "range {}..={} with step {} exceeds {} points",
                    self.min_change_percent, self.max_change_percent, self.step_percent, MAX_GRID_POINTS
                ),
            });
        }
        Ok(())
    }

    /// Number of grid steps, both ends included
    pub fn point_count(&self) -> usize {
        let span = (self.max_change_percent - self.min_change_percent) / self.step_percent;
        // tolerate representation error on the upper bound
        ((span + 1e-9).floor() as usize).saturating_add(1)
    }

    /// Ascending price offsets, computed by index so the grid never drifts
    pub fn price_changes(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.point_count()).map(move |i| self.min_change_percent + i as f64 * self.step_percent)
    }
}

/// Scaling applied to the first checkpoint to mimic an IV collapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvCrushConfig {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for IvCrushConfig {
    fn default() -> Self {
        IvCrushConfig {
            low: 0.9,
            medium: 0.8,
            high: 0.7,
        }
    }
}

impl IvCrushConfig {
    pub fn validate(&self) -> PnlResult<()> {
        validate_range("iv_crush.low", self.low, 0.0, 1.0)?;
        validate_range("iv_crush.medium", self.medium, 0.0, 1.0)?;
        validate_range("iv_crush.high", self.high, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub grid: GridConfig,
    pub probability: ProbabilityConfig,
    pub iv_crush: IvCrushConfig,
}

impl ScenarioConfig {
    pub fn validate(&self) -> PnlResult<()> {
        self.grid.validate()?;
        self.probability.validate()?;
        self.iv_crush.validate()
    }

    /// Parse a (possibly partial) JSON configuration; missing fields keep their defaults
    pub fn from_json(json: &str) -> PnlResult<Self> {
        let cfg: ScenarioConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Inputs of one scenario generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub current_price: f64,
    pub strike: f64,
    pub strategy: StrategyKind,
    pub net_debit: f64,
    /// Only consulted by the calendar cap
    pub max_profit: f64,
    pub days_to_expiration: Vec<u32>,
}

impl ScenarioRequest {
    pub fn validate(&self) -> PnlResult<()> {
        validate_positive("current_price", self.current_price)?;
        validate_finite("current_price", self.current_price)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_finite("net_debit", self.net_debit)?;
        if self.max_profit.is_nan() {
            return Err(PnlError::InvalidParameters {
                parameter: "max_profit".to_string(),
                value: self.max_profit,
                constraint: "must not be NaN".to_string(),
            });
        }
        Ok(())
    }

    pub fn strategy_model(&self) -> Strategy {
        Strategy::from_kind(self.strategy, self.strike, self.net_debit, self.max_profit)
    }
}

/// P&L at the first checkpoint under 10/20/30% IV collapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvCrushVariants {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// One row of the P&L grid at a fixed price offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPoint {
    pub price_change_percent: f64,
    pub absolute_price: f64,
    /// Aligned by index with [`ScenarioSet::days_axis`]
    pub pnl_by_day: Vec<f64>,
    /// `None` only when the day axis is empty
    pub iv_crush_variants: Option<IvCrushVariants>,
    pub probability_weight: f64,
}

/// Output of one generation call
///
/// The day axis is stored once and shared by every point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub current_price: f64,
    pub days_to_expiration: Vec<u32>,
    pub points: Vec<ScenarioPoint>,
}

impl ScenarioSet {
    pub fn days_axis(&self) -> &[u32] {
        &self.days_to_expiration
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every point must carry exactly one P&L value per checkpoint
    pub fn validate(&self) -> PnlResult<()> {
        let expected = self.days_to_expiration.len();
        if let Some((i, p)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| p.pnl_by_day.len() != expected)
        {
            return Err(PnlError::InvalidConfiguration {
                field: "pnl_by_day".to_string(),
                reason: format!(
                    "point {} has {} values for an axis of {} checkpoints",
                    i,
                    p.pnl_by_day.len(),
                    expected
                ),
            });
        }
        Ok(())
    }

    /// Checks the set's shape and that `day_index` names a checkpoint
    pub fn check_day_index(&self, day_index: usize) -> PnlResult<()> {
        self.validate()?;
        if day_index >= self.days_to_expiration.len() {
            return Err(PnlError::DayIndexOutOfRange {
                index: day_index,
                len: self.days_to_expiration.len(),
            });
        }
        Ok(())
    }

    /// `(price_change_percent, pnl)` pairs at one checkpoint, ascending by price change
    pub fn column(&self, day_index: usize) -> PnlResult<Vec<(f64, f64)>> {
        self.check_day_index(day_index)?;
        Ok(self
            .points
            .iter()
            .map(|p| (p.price_change_percent, p.pnl_by_day[day_index]))
            .collect())
    }

    pub fn to_json(&self) -> PnlResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Scenario grid builder
///
/// # Algorithm
///
/// For each price offset `pct` on the grid:
/// ```text
/// S(pct)      = spot * (1 + pct/100)
/// pnl[d]      = model.pnl(S(pct), days[d])     for every checkpoint d
/// iv_crush    = pnl[0] * {low, medium, high}
/// weight      = φ((pct/100) / σ_h)
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    config: ScenarioConfig,
    probability: ProbabilityModel,
}

impl ScenarioGenerator {
    pub fn new(config: ScenarioConfig) -> PnlResult<Self> {
        config.validate()?;
        let probability = ProbabilityModel::new(&config.probability)?;
        Ok(ScenarioGenerator {
            config,
            probability,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Generate the grid for a built-in strategy
    pub fn generate(&self, request: &ScenarioRequest) -> PnlResult<ScenarioSet> {
        request.validate()?;
        let model = request.strategy_model();
        self.generate_with(request.current_price, &model, &request.days_to_expiration)
    }

    /// Generate the grid for any position model
    pub fn generate_with<M: PositionModel + ?Sized>(
        &self,
        current_price: f64,
        model: &M,
        days_axis: &[u32],
    ) -> PnlResult<ScenarioSet> {
        validate_positive("current_price", current_price)?;
        validate_finite("current_price", current_price)?;

        if days_axis.windows(2).any(|w| w[1] > w[0]) {
            tracing::warn!(?days_axis, "day axis is not non-increasing; first checkpoint still drives IV crush");
        }
        if days_axis.is_empty() {
            tracing::warn!(strategy = model.name(), "empty day axis; points carry no P&L");
        }

        let crush = self.config.iv_crush;
        let points: Vec<ScenarioPoint> = self
            .config
            .grid
            .price_changes()
            .map(|pct| {
                let absolute_price = current_price * (1.0 + pct / 100.0);
                let pnl_by_day: Vec<f64> = days_axis
                    .iter()
                    .map(|&days| model.pnl(absolute_price, days))
                    .collect();
                let iv_crush_variants = pnl_by_day.first().map(|&pnl| IvCrushVariants {
                    low: pnl * crush.low,
                    medium: pnl * crush.medium,
                    high: pnl * crush.high,
                });
                ScenarioPoint {
                    price_change_percent: pct,
                    absolute_price,
                    pnl_by_day,
                    iv_crush_variants,
                    probability_weight: self.probability.weight(pct),
                }
            })
            .collect();

        tracing::debug!(
            strategy = model.name(),
            points = points.len(),
            checkpoints = days_axis.len(),
            "generated scenario grid"
        );

        Ok(ScenarioSet {
            current_price,
            days_to_expiration: days_axis.to_vec(),
            points,
        })
    }

    /// Generate many independent grids in parallel; output order follows input order
    pub fn generate_batch(&self, requests: &[ScenarioRequest]) -> Vec<PnlResult<ScenarioSet>> {
        requests.par_iter().map(|req| self.generate(req)).collect()
    }
}

/// Generate a scenario grid with the default configuration
///
/// # Parameters
/// - `current_price`: Spot price of the underlying (> 0)
/// - `strike_price`: Strike of the strategy (> 0)
/// - `strategy`: Built-in strategy
/// - `net_debit`: Cost basis of the position
/// - `max_profit`: Calendar profit ceiling (ignored by the straddle)
/// - `days_axis`: Checkpoints, conventionally decreasing and ending with 0
pub fn generate_scenarios(
    current_price: f64,
    strike_price: f64,
    strategy: StrategyKind,
    net_debit: f64,
    max_profit: f64,
    days_axis: &[u32],
) -> PnlResult<ScenarioSet> {
    let generator = ScenarioGenerator::new(ScenarioConfig::default())?;
    generator.generate(&ScenarioRequest {
        current_price,
        strike: strike_price,
        strategy,
        net_debit,
        max_profit,
        days_to_expiration: days_axis.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn request(strategy: StrategyKind, days: &[u32]) -> ScenarioRequest {
        ScenarioRequest {
            current_price: 100.0,
            strike: 100.0,
            strategy,
            net_debit: 2.5,
            max_profit: 7.5,
            days_to_expiration: days.to_vec(),
        }
    }

    #[test]
    fn test_default_grid() {
        let grid = GridConfig::default();
        let changes: Vec<f64> = grid.price_changes().collect();
        assert_eq!(changes.len(), 31);
        assert_eq!(changes[0], -30.0);
        assert_eq!(changes[15], 0.0);
        assert_eq!(changes[30], 30.0);
    }

    #[test]
    fn test_grid_with_uneven_span() {
        let grid = GridConfig {
            min_change_percent: -10.0,
            max_change_percent: 10.0,
            step_percent: 3.0,
        };
        let changes: Vec<f64> = grid.price_changes().collect();
        assert_eq!(changes, vec![-10.0, -7.0, -4.0, -1.0, 2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_grid_validation() {
        let bad_step = GridConfig {
            step_percent: 0.0,
            ..Default::default()
        };
        assert!(bad_step.validate().is_err());

        let inverted = GridConfig {
            min_change_percent: 10.0,
            max_change_percent: -10.0,
            step_percent: 1.0,
        };
        assert!(matches!(
            inverted.validate(),
            Err(PnlError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_grid_point_limit() {
        let huge = GridConfig {
            min_change_percent: -30.0,
            max_change_percent: 1e300,
            step_percent: 1e-300,
        };
        assert!(matches!(
            huge.validate(),
            Err(PnlError::InvalidConfiguration { .. })
        ));
        assert!(ScenarioConfig::from_json(
            r#"{"grid":{"min_change_percent":-30,"max_change_percent":1e300,"step_percent":1e-300}}"#
        )
        .is_err());

        let too_fine = GridConfig {
            step_percent: 0.001,
            ..Default::default()
        };
        assert!(too_fine.validate().is_err());

        let at_limit = GridConfig {
            min_change_percent: 0.0,
            max_change_percent: (MAX_GRID_POINTS - 1) as f64,
            step_percent: 1.0,
        };
        assert!(at_limit.validate().is_ok());
        assert_eq!(at_limit.point_count(), MAX_GRID_POINTS);
    }

    #[test]
    fn test_ragged_set_is_rejected() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let mut set = generator
            .generate(&request(StrategyKind::Straddle, &[5, 0]))
            .unwrap();
        assert!(set.validate().is_ok());

        set.points[0].pnl_by_day.push(1.0);
        set.points[1].pnl_by_day.pop();
        assert!(matches!(
            set.validate(),
            Err(PnlError::InvalidConfiguration { .. })
        ));
        assert!(set.column(1).is_err());
    }

    #[test]
    fn test_increasing_axis_crush_uses_first_entry() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let set = generator
            .generate(&request(StrategyKind::Calendar, &[0, 30]))
            .unwrap();
        assert_eq!(set.days_axis(), &[0, 30]);
        for p in &set.points {
            let crush = p.iv_crush_variants.unwrap();
            assert_relative_eq!(crush.low, p.pnl_by_day[0] * 0.9);
            assert_relative_eq!(crush.high, p.pnl_by_day[0] * 0.7);
        }
        // at expiration the ATM calendar loses its debit; after 30 days its P&L is 0
        let atm = &set.points[15];
        assert_relative_eq!(atm.iv_crush_variants.unwrap().medium, -2.5 * 0.8);
        assert_ne!(atm.pnl_by_day[0], atm.pnl_by_day[1]);
    }

    #[test]
    fn test_iv_crush_from_first_checkpoint() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let set = generator
            .generate(&request(StrategyKind::Straddle, &[14, 0]))
            .unwrap();
        for p in &set.points {
            let crush = p.iv_crush_variants.unwrap();
            assert_relative_eq!(crush.low, p.pnl_by_day[0] * 0.9);
            assert_relative_eq!(crush.medium, p.pnl_by_day[0] * 0.8);
            assert_relative_eq!(crush.high, p.pnl_by_day[0] * 0.7);
        }
    }

    #[test]
    fn test_empty_axis_yields_empty_pnl() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let set = generator.generate(&request(StrategyKind::Calendar, &[])).unwrap();
        assert_eq!(set.len(), 31);
        assert!(set
            .points
            .iter()
            .all(|p| p.pnl_by_day.is_empty() && p.iv_crush_variants.is_none()));
        assert!(set.column(0).is_err());
    }

    #[test]
    fn test_rejects_invalid_request() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let mut req = request(StrategyKind::Calendar, &[30, 0]);
        req.strike = 0.0;
        assert!(generator.generate(&req).is_err());

        let mut req = request(StrategyKind::Calendar, &[30, 0]);
        req.current_price = -1.0;
        assert!(matches!(
            generator.generate(&req),
            Err(PnlError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg = ScenarioConfig::from_json(r#"{"grid": {"step_percent": 5.0}}"#).unwrap();
        assert_eq!(cfg.grid.step_percent, 5.0);
        assert_eq!(cfg.grid.min_change_percent, -30.0);
        assert_eq!(cfg.probability, ProbabilityConfig::default());
        assert_eq!(cfg.grid.point_count(), 13);

        assert!(ScenarioConfig::from_json(r#"{"iv_crush": {"low": 1.5}}"#).is_err());
        assert!(matches!(
            ScenarioConfig::from_json("not json"),
            Err(PnlError::Serialization(_))
        ));
    }

    #[test]
    fn test_batch_preserves_order() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default()).unwrap();
        let requests: Vec<ScenarioRequest> = (0..8)
            .map(|i| ScenarioRequest {
                current_price: 100.0 + i as f64,
                ..request(StrategyKind::Calendar, &DEFAULT_DAYS_AXIS)
            })
            .collect();
        let results = generator.generate_batch(&requests);
        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            let set = result.as_ref().unwrap();
            assert_eq!(set.current_price, 100.0 + i as f64);
            assert_eq!(set, &generator.generate(&requests[i]).unwrap());
        }
    }
}
