pub mod aggregator;
pub mod surface;

pub use aggregator::{
    breakeven_points, expected_pnl, interpolate_breakevens, max_loss, max_profit,
    probability_of_profit, time_frame_labels, win_rate, Breakeven, ScenarioSummary,
};
pub use surface::{MetadataMode, PnlSurface, SurfaceMetadata, SurfaceOptions};
