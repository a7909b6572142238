use crate::config::{BacktestConfiguration, ConfigError};
use crate::data::{validate_bars, Bar, DataError};
use crate::engine::simulator::{AccountState, SimulationError, Simulator, Trade};
use crate::execution::{ExecutionClient, NoopExecution};
use crate::metrics::{calculate_equity_curve, BacktestSummary, EquityPoint};
use crate::risk::PositionSizer;
use crate::signal::{self, SignalError, StrategyError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub summary: BacktestSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

//orchestrates one run: resolve the strategy, annotate the bars, hand
//everything to the simulator, reduce the trades into metrics
//each engine owns its bars, account and sizer; nothing is shared
//across concurrent runs
pub struct BacktestEngine {
    config: BacktestConfiguration,
    bars: Vec<Bar>,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfiguration, bars: Vec<Bar>) -> Self {
        BacktestEngine { config, bars }
    }

    //runs against the no-op execution stub
    pub fn run(&self) -> Result<BacktestResult, EngineError> {
        self.run_with_client(&mut NoopExecution)
    }

    //runs against a caller-supplied execution client; the client sees
    //only accepted entry and exit decisions
    pub fn run_with_client(
        &self,
        exec: &mut dyn ExecutionClient,
    ) -> Result<BacktestResult, EngineError> {
        //all validation is surfaced before the run starts
        self.config.validate()?;
        validate_bars(&self.bars)?;

        //resolved exactly once; unknown names abort here
        let source = signal::resolve(&self.config.strategy)?;
        let annotations = source.annotate(&self.bars, &self.config.risk)?;

        let sizer = PositionSizer::new(&self.config.risk);
        let simulator = Simulator::new(&self.config.risk, &sizer, self.config.tie_break);
        let mut account = AccountState::new(self.config.initial_balance);

        let trades = simulator.run(&self.bars, &annotations, &mut account, exec)?;

        let equity_curve =
            calculate_equity_curve(self.config.initial_balance, &trades, &self.bars);
        let summary = BacktestSummary::from_trades(
            &trades,
            &self.bars,
            self.config.initial_balance,
            account.balance,
        );

        Ok(BacktestResult {
            summary,
            equity_curve,
            trades,
        })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn config(&self) -> &BacktestConfiguration {
        &self.config
    }
}
