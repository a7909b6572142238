use crate::data::Bar;
use crate::engine::Trade;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics reduced from the trade sequence and ending balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub initial_balance: f64,
    pub ending_balance: f64,
    pub num_trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub avg_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub pnl_std_dev: f64,
    //present only when bars carry timestamps
    pub trades_per_day: Option<f64>,
    pub trades_per_week: Option<f64>,
}

impl BacktestSummary {
    //pure reduction over the trade sequence; no simulation state leaks in
    pub fn from_trades(
        trades: &[Trade],
        bars: &[Bar],
        initial_balance: f64,
        ending_balance: f64,
    ) -> Self {
        let num_trades = trades.len();
        let pnls: Vec<f64> = trades.iter().map(|t| t.realized_pnl).collect();
        let total_pnl: f64 = pnls.iter().sum();

        let wins: Vec<f64> = pnls.iter().filter(|&&p| p > 0.0).copied().collect();
        let losses: Vec<f64> = pnls.iter().filter(|&&p| p < 0.0).copied().collect();

        let win_rate = if num_trades > 0 {
            wins.len() as f64 / num_trades as f64
        } else {
            0.0
        };
        let avg_pnl = if num_trades > 0 {
            total_pnl / num_trades as f64
        } else {
            0.0
        };
        let avg_win = if !wins.is_empty() {
            wins.iter().sum::<f64>() / wins.len() as f64
        } else {
            0.0
        };
        let avg_loss = if !losses.is_empty() {
            losses.iter().sum::<f64>() / losses.len() as f64
        } else {
            0.0
        };

        let total_wins: f64 = wins.iter().sum();
        let total_losses: f64 = losses.iter().sum::<f64>().abs();
        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let largest_win = wins.iter().fold(0.0f64, |a, &b| a.max(b));
        let largest_loss = losses.iter().fold(0.0f64, |a, &b| a.min(b));

        let pnl_std_dev = if pnls.len() >= 2 {
            pnls.as_slice().std_dev()
        } else {
            0.0
        };

        let (trades_per_day, trades_per_week) = trade_frequency(trades, bars);

        BacktestSummary {
            initial_balance,
            ending_balance,
            num_trades,
            total_pnl,
            win_rate,
            avg_pnl,
            avg_win,
            avg_loss,
            profit_factor,
            largest_win,
            largest_loss,
            pnl_std_dev,
            trades_per_day,
            trades_per_week,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Initial Balance"),
            Cell::new(&format!("${:.2}", self.initial_balance)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Ending Balance"),
            Cell::new(&format!("${:.2}", self.ending_balance)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Trades"),
            Cell::new(&format!("{}", self.num_trades)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total PnL"),
            Cell::new(&format!("${:.2}", self.total_pnl)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.2}%", self.win_rate * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg PnL"),
            Cell::new(&format!("${:.2}", self.avg_pnl)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Win"),
            Cell::new(&format!("${:.2}", self.avg_win)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Loss"),
            Cell::new(&format!("${:.2}", self.avg_loss)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Largest Win"),
            Cell::new(&format!("${:.2}", self.largest_win)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Largest Loss"),
            Cell::new(&format!("${:.2}", self.largest_loss)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Profit Factor"),
            Cell::new(&format!("{:.3}", self.profit_factor)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("PnL Std Dev"),
            Cell::new(&format!("${:.2}", self.pnl_std_dev)),
        ]));

        if let Some(per_day) = self.trades_per_day {
            table.add_row(Row::new(vec![
                Cell::new("Trades / Day"),
                Cell::new(&format!("{:.2}", per_day)),
            ]));
        }

        if let Some(per_week) = self.trades_per_week {
            table.add_row(Row::new(vec![
                Cell::new("Trades / Week"),
                Cell::new(&format!("{:.2}", per_week)),
            ]));
        }

        table.printstd();
    }
}

//trade counts over the calendar span between the first and last entry
//timestamp; absent (not zero) when the bars carry no timestamps
fn trade_frequency(trades: &[Trade], bars: &[Bar]) -> (Option<f64>, Option<f64>) {
    if trades.is_empty() {
        return (None, None);
    }

    let mut entry_times = Vec::with_capacity(trades.len());
    for trade in trades {
        match bars.get(trade.entry_index).and_then(|b| b.timestamp) {
            Some(ts) => entry_times.push(ts),
            None => return (None, None),
        }
    }

    let first = entry_times.iter().min().copied();
    let last = entry_times.iter().max().copied();
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => return (None, None),
    };

    let days = (last - first).num_days() + 1;
    let weeks = (days / 7).max(1);

    let per_day = trades.len() as f64 / days as f64;
    let per_week = trades.len() as f64 / weeks as f64;
    (Some(per_day), Some(per_week))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExitReason;
    use crate::signal::Direction;
    use chrono::{TimeZone, Utc};

    fn trade(entry_index: usize, pnl: f64) -> Trade {
        Trade {
            entry_index,
            exit_index: entry_index,
            entry_price: 100.0,
            exit_price: 100.0,
            direction: Direction::Long,
            position_size: 1,
            realized_pnl: pnl,
            exit_reason: ExitReason::EndOfData,
        }
    }

    #[test]
    fn empty_trades_zero_summary() {
        let summary = BacktestSummary::from_trades(&[], &[], 10000.0, 10000.0);
        assert_eq!(summary.num_trades, 0);
        assert_eq!(summary.total_pnl, 0.0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.avg_pnl, 0.0);
        assert_eq!(summary.ending_balance, 10000.0);
        assert_eq!(summary.trades_per_day, None);
        assert_eq!(summary.trades_per_week, None);
    }

    #[test]
    fn basic_reduction() {
        let trades = vec![trade(0, 100.0), trade(1, -40.0), trade(2, 60.0)];
        let summary = BacktestSummary::from_trades(&trades, &[], 10000.0, 10120.0);

        assert_eq!(summary.num_trades, 3);
        assert!((summary.total_pnl - 120.0).abs() < 1e-9);
        assert!((summary.win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_pnl - 40.0).abs() < 1e-9);
        assert!((summary.avg_win - 80.0).abs() < 1e-9);
        assert!((summary.avg_loss + 40.0).abs() < 1e-9);
        assert!((summary.profit_factor - 4.0).abs() < 1e-9);
        assert_eq!(summary.largest_win, 100.0);
        assert_eq!(summary.largest_loss, -40.0);
    }

    #[test]
    fn frequency_requires_timestamps() {
        let trades = vec![trade(0, 10.0), trade(1, 10.0)];
        let bars = vec![Bar::flat(100.0), Bar::flat(100.0)];
        let summary = BacktestSummary::from_trades(&trades, &bars, 1000.0, 1020.0);
        assert_eq!(summary.trades_per_day, None);
        assert_eq!(summary.trades_per_week, None);
    }

    #[test]
    fn frequency_over_calendar_span() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
        let bars = vec![
            Bar::new_unchecked(100.0, 100.0, 100.0, 100.0, 0.0, Some(t0)),
            Bar::new_unchecked(100.0, 100.0, 100.0, 100.0, 0.0, Some(t1)),
        ];
        let trades = vec![trade(0, 10.0), trade(1, 10.0)];
        let summary = BacktestSummary::from_trades(&trades, &bars, 1000.0, 1020.0);

        //span is 14 calendar days, 2 whole weeks
        assert!((summary.trades_per_day.unwrap() - 2.0 / 14.0).abs() < 1e-9);
        assert!((summary.trades_per_week.unwrap() - 1.0).abs() < 1e-9);
    }
}
