pub mod backtest;
pub mod simulator;

pub use backtest::{BacktestEngine, BacktestResult, EngineError};
pub use simulator::{AccountState, ExitReason, SimulationError, Simulator, Trade};
