pub mod engine;
pub mod payoffs;
pub mod probability;

pub use engine::{
    generate_scenarios, GridConfig, IvCrushConfig, IvCrushVariants, ScenarioConfig,
    ScenarioGenerator, ScenarioPoint, ScenarioRequest, ScenarioSet, DEFAULT_DAYS_AXIS,
};
pub use payoffs::{CalendarSpread, PositionModel, Straddle, Strategy, StrategyKind};
pub use probability::{ProbabilityConfig, ProbabilityModel};
