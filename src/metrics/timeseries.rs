use crate::data::Bar;
use crate::engine::Trade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point in the per-trade equity curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    //0 is the initial stake, k is the state after trade k
    pub trade_number: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub equity: f64,
    pub drawdown: f64,
}

//derives the equity curve: starts at the initial balance and takes one
//cumulative step per trade in chronological order; reporting only
pub fn calculate_equity_curve(
    initial_balance: f64,
    trades: &[Trade],
    bars: &[Bar],
) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(trades.len() + 1);
    let mut equity = initial_balance;
    let mut peak = initial_balance;

    curve.push(EquityPoint {
        trade_number: 0,
        timestamp: bars.first().and_then(|b| b.timestamp),
        equity,
        drawdown: 0.0,
    });

    for (k, trade) in trades.iter().enumerate() {
        equity += trade.realized_pnl;
        if equity > peak {
            peak = equity;
        }
        let drawdown = if peak > 0.0 { (peak - equity) / peak } else { 0.0 };

        curve.push(EquityPoint {
            trade_number: k + 1,
            timestamp: bars.get(trade.exit_index).and_then(|b| b.timestamp),
            equity,
            drawdown,
        });
    }

    curve
}

//maximum drawdown over the curve
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExitReason;
    use crate::signal::Direction;

    fn trade(pnl: f64) -> Trade {
        Trade {
            entry_index: 0,
            exit_index: 0,
            entry_price: 100.0,
            exit_price: 100.0,
            direction: Direction::Long,
            position_size: 1,
            realized_pnl: pnl,
            exit_reason: ExitReason::EndOfData,
        }
    }

    #[test]
    fn curve_starts_at_initial_balance() {
        let curve = calculate_equity_curve(10000.0, &[], &[]);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].equity, 10000.0);
        assert_eq!(curve[0].drawdown, 0.0);
    }

    #[test]
    fn one_step_per_trade() {
        let trades = vec![trade(100.0), trade(-50.0), trade(25.0)];
        let curve = calculate_equity_curve(1000.0, &trades, &[]);

        assert_eq!(curve.len(), 4);
        assert_eq!(curve[1].equity, 1100.0);
        assert_eq!(curve[2].equity, 1050.0);
        assert_eq!(curve[3].equity, 1075.0);
    }

    #[test]
    fn drawdown_measured_from_peak() {
        let trades = vec![trade(100.0), trade(-220.0)];
        let curve = calculate_equity_curve(1000.0, &trades, &[]);

        //peak 1100, trough 880 => 20% drawdown
        assert!((curve[2].drawdown - 0.2).abs() < 1e-9);
        assert!((max_drawdown(&curve) - 0.2).abs() < 1e-9);
    }
}
