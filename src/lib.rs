//! # fast-pnl: Options Strategy Analytics
//!
//! The computational core behind an options-strategy dashboard: P&L scenario
//! grids across price and time, closed-form Black-Scholes Greeks, and the risk
//! statistics derived from them.
//!
//! ## Key Features
//!
//! - **Scenario Grids**: price × days-to-expiration P&L cubes with IV-crush
//!   variants and normal-density probability weights
//! - **Strategy Models**: calendar spreads and straddles behind one trait
//! - **Greeks**: delta, gamma, theta, vega, rho with price and time sweeps
//! - **Risk Metrics**: breakevens, probability of profit, win rate, surfaces
//! - **Parallel Batches**: many independent grids at once with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_pnl::scenario::{generate_scenarios, StrategyKind};
//! use fast_pnl::metrics::ScenarioSummary;
//!
//! // Calendar spread, spot 100, strike 100, 2.50 debit
//! let set = generate_scenarios(100.0, 100.0, StrategyKind::Calendar, 2.5, 7.5, &[30, 14, 0])
//!     .expect("Valid inputs");
//!
//! // Statistics at expiration (last checkpoint)
//! let summary = ScenarioSummary::compute(&set, 2).expect("Checkpoint exists");
//! println!("Max profit {:.2}, P(profit) {:.1}%", summary.max_profit, summary.probability_of_profit * 100.0);
//! ```
//!
//! ## Numerical Contract
//!
//! Every computation is a pure function of its inputs. Entry points that build
//! grids validate their inputs and return [`PnlResult`]; the raw Greeks
//! functions follow IEEE-754 and return NaN/∞ for degenerate inputs.

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod analytics;
pub mod scenario;
pub mod metrics;
pub mod payload;
pub mod demo;
pub mod output;

// Re-export commonly used types for convenience
pub use error::{PnlError, PnlResult};
