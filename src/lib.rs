//a Rust-based signal-driven backtesting engine for futures contracts

pub mod config;
pub mod data;
pub mod engine;
pub mod execution;
pub mod metrics;
pub mod risk;
pub mod signal;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        BacktestConfiguration, ConfigError, RandomEntryParams, RiskParameters, RsiCooldownParams,
        RsiReversalParams, SmaFallbackParams, StrategyParams, StrategySpec, TieBreak,
    };
    pub use crate::data::{load_csv, random_walk, validate_bars, Bar, DataError};
    pub use crate::engine::{
        AccountState, BacktestEngine, BacktestResult, EngineError, ExitReason, Simulator, Trade,
    };
    pub use crate::execution::{ExecutionClient, NoopExecution, OrderIntent};
    pub use crate::metrics::{calculate_equity_curve, BacktestSummary, EquityPoint};
    pub use crate::risk::PositionSizer;
    pub use crate::signal::{
        resolve, Direction, RandomEntrySource, RsiCooldownSource, RsiReversalSource,
        SignalAnnotation, SignalSource, SmaFallbackSource, StrategyError,
    };
}
