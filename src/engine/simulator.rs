use crate::config::{RiskParameters, TieBreak};
use crate::data::Bar;
use crate::execution::{ExecutionClient, ExecutionError, OrderIntent};
use crate::risk::PositionSizer;
use crate::signal::{Direction, SignalAnnotation, SignalError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

//why a trade closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    EndOfData,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::EndOfData => "end_of_data",
        };
        write!(f, "{}", s)
    }
}

//a completed round trip, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub direction: Direction,
    pub position_size: u32,
    pub realized_pnl: f64,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.realized_pnl > 0.0
    }
}

//running account state, written only by the simulator after a close
//each run owns its own instance; nothing is shared across runs
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub initial_balance: f64,
    pub balance: f64,
    pub in_position: bool,
}

impl AccountState {
    pub fn new(initial_balance: f64) -> Self {
        AccountState {
            initial_balance,
            balance: initial_balance,
            in_position: false,
        }
    }
}

//the forward-scanning trade resolution core
//two states: scanning (advancing the bar index looking for a non-flat
//annotation) and in-trade (scanning forward from entry+1 for an exit);
//at most one open position at any index, annotations inside an open
//trade are ignored and the closing bar is consumed, never re-entered
pub struct Simulator<'a> {
    params: &'a RiskParameters,
    sizer: &'a PositionSizer,
    tie_break: TieBreak,
}

impl<'a> Simulator<'a> {
    pub fn new(params: &'a RiskParameters, sizer: &'a PositionSizer, tie_break: TieBreak) -> Self {
        Simulator {
            params,
            sizer,
            tie_break,
        }
    }

    pub fn run(
        &self,
        bars: &[Bar],
        annotations: &[SignalAnnotation],
        account: &mut AccountState,
        exec: &mut dyn ExecutionClient,
    ) -> Result<Vec<Trade>, SimulationError> {
        //a zero-length sequence yields zero trades without error
        if bars.is_empty() {
            return Ok(Vec::new());
        }
        if annotations.len() != bars.len() {
            return Err(SignalError::LengthMismatch {
                annotations: annotations.len(),
                bars: bars.len(),
            }
            .into());
        }

        let n = bars.len();
        let mut trades = Vec::new();
        let mut i = 0;

        while i < n {
            let annotation = &annotations[i];
            if annotation.direction.is_flat() {
                i += 1;
                continue;
            }

            let trade = self.open_and_resolve(bars, annotation, i, account, exec)?;
            i = trade.exit_index + 1;
            trades.push(trade);
        }

        Ok(trades)
    }

    //opens a trade at the entry bar's close, then scans forward for a
    //stop or target crossing; missing crossings force-close at the
    //final bar's close
    fn open_and_resolve(
        &self,
        bars: &[Bar],
        annotation: &SignalAnnotation,
        entry_index: usize,
        account: &mut AccountState,
        exec: &mut dyn ExecutionClient,
    ) -> Result<Trade, SimulationError> {
        let n = bars.len();
        let direction = annotation.direction;
        let sign = direction.sign();
        let entry_price = bars[entry_index].close;

        //explicit annotation levels win over configured defaults
        let stop_ticks = annotation
            .stop_loss_ticks
            .unwrap_or(self.params.stop_loss_ticks);
        let stop_distance = self.params.ticks_to_price(stop_ticks);
        let stop_price = annotation
            .stop_price
            .unwrap_or(entry_price - sign as f64 * stop_distance);
        let target_price = annotation
            .target_price
            .unwrap_or(entry_price + sign as f64 * stop_distance * self.params.risk_to_reward);

        //sized against the balance as it stands at entry
        let position_size = self
            .sizer
            .size(account.balance, stop_ticks, self.params.tick_value);

        account.in_position = true;
        exec.on_entry(&OrderIntent {
            index: entry_index,
            direction,
            price: entry_price,
            size: position_size,
            stop_price,
            target_price,
        })?;

        //default exit: forced close at the last bar
        let mut exit_index = n - 1;
        let mut exit_price = bars[n - 1].close;
        let mut exit_reason = ExitReason::EndOfData;

        for (j, bar) in bars.iter().enumerate().skip(entry_index + 1) {
            let stop_hit = match direction {
                Direction::Long => bar.low <= stop_price,
                Direction::Short => bar.high >= stop_price,
                Direction::Flat => false,
            };
            let target_hit = match direction {
                Direction::Long => bar.high >= target_price,
                Direction::Short => bar.low <= target_price,
                Direction::Flat => false,
            };

            let outcome = match (stop_hit, target_hit) {
                (true, true) => match self.tie_break {
                    TieBreak::StopFirst => Some((ExitReason::StopLoss, stop_price)),
                    TieBreak::TargetFirst => Some((ExitReason::TakeProfit, target_price)),
                },
                (true, false) => Some((ExitReason::StopLoss, stop_price)),
                (false, true) => Some((ExitReason::TakeProfit, target_price)),
                (false, false) => None,
            };

            if let Some((reason, price)) = outcome {
                exit_index = j;
                exit_price = price;
                exit_reason = reason;
                break;
            }
        }

        let realized_pnl = self.params.pnl(entry_price, exit_price, sign, position_size);
        account.balance += realized_pnl;
        account.in_position = false;

        let trade = Trade {
            entry_index,
            exit_index,
            entry_price,
            exit_price,
            direction,
            position_size,
            realized_pnl,
            exit_reason,
        };
        exec.on_exit(&trade)?;
        Ok(trade)
    }
}
