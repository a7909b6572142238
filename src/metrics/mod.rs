pub mod summary;
pub mod timeseries;

pub use summary::BacktestSummary;
pub use timeseries::{calculate_equity_curve, max_drawdown, EquityPoint};
