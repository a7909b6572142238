use crate::engine::Trade;
use crate::signal::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Order rejected: {0}")]
    Rejected(String),
}

//an accepted entry decision, as the core hands it to an execution
//client; the live path consumes exactly this and nothing more
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub index: usize,
    pub direction: Direction,
    pub price: f64,
    pub size: u32,
    pub stop_price: f64,
    pub target_price: f64,
}

//sink for the core's entry/exit decisions
//backtests run against the no-op stub; a live broker client implements
//the same trait out of core scope
pub trait ExecutionClient {
    fn on_entry(&mut self, intent: &OrderIntent) -> Result<(), ExecutionError>;
    fn on_exit(&mut self, trade: &Trade) -> Result<(), ExecutionError>;
}

//no-op execution client used by every backtest
#[derive(Debug, Default)]
pub struct NoopExecution;

impl ExecutionClient for NoopExecution {
    fn on_entry(&mut self, _intent: &OrderIntent) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn on_exit(&mut self, _trade: &Trade) -> Result<(), ExecutionError> {
        Ok(())
    }
}

//records every decision it sees; test instrumentation
#[derive(Debug, Default)]
pub struct RecordingExecution {
    pub entries: Vec<OrderIntent>,
    pub exits: Vec<Trade>,
}

impl ExecutionClient for RecordingExecution {
    fn on_entry(&mut self, intent: &OrderIntent) -> Result<(), ExecutionError> {
        self.entries.push(intent.clone());
        Ok(())
    }

    fn on_exit(&mut self, trade: &Trade) -> Result<(), ExecutionError> {
        self.exits.push(trade.clone());
        Ok(())
    }
}
