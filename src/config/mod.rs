pub mod backtest_config;
pub mod risk;

pub use backtest_config::{
    BacktestConfiguration, RandomEntryParams, RsiCooldownParams, RsiReversalParams,
    SmaFallbackParams, StrategyParams, StrategySpec, TieBreak,
};
pub use risk::{ConfigError, RiskParameters};
