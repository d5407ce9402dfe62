pub mod bs_analytic;
pub mod greeks_series;

pub use bs_analytic::{compute_greeks, compute_greeks_for, Greeks, OptionKind};
pub use greeks_series::{greeks_decay, greeks_series, GreeksPoint, GreeksSeriesConfig};
