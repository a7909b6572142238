use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pozole::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pozole")]
#[command(about = "A Rust-based signal-driven backtesting engine for futures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //path to csv data file; a seeded random walk is generated when omitted
        #[arg(long)]
        data: Option<PathBuf>,

        //bar count for the generated walk
        #[arg(long, default_value = "10000")]
        bars: usize,

        //strategy name (sma, rsi, rsi_cooldown, random)
        #[arg(long)]
        strategy: String,

        //initial account balance
        #[arg(long, default_value = "10000")]
        initial_balance: f64,

        //fraction of balance risked per trade
        #[arg(long, default_value = "0.01")]
        risk_per_trade: f64,

        //target distance as a multiple of the stop distance
        #[arg(long, default_value = "2.0")]
        risk_to_reward: f64,

        //default stop distance in ticks
        #[arg(long, default_value = "20")]
        stop_loss_ticks: u32,

        //hard cap on contracts per trade
        #[arg(long, default_value = "10")]
        max_position_size: u32,

        //tick size
        #[arg(long, default_value = "0.25")]
        tick_size: f64,

        //tick value (dollar value of one tick)
        #[arg(long, default_value = "1.25")]
        tick_value: f64,

        //same-bar exit tie-break (stop_first, target_first)
        #[arg(long, default_value = "stop_first")]
        tie_break: String,

        //sma strategy parameters
        //rolling window (for sma strategy)
        #[arg(long)]
        sma_window: Option<usize>,

        //rsi strategy parameters
        //rsi lookback period (for rsi strategies)
        #[arg(long)]
        rsi_period: Option<usize>,

        //rsi entry threshold (for rsi strategies)
        #[arg(long)]
        rsi_entry: Option<f64>,

        //cooldown window in bars (for rsi_cooldown)
        #[arg(long)]
        cooldown_bars: Option<usize>,

        //random strategy parameters
        //per-bar entry probability (for random strategy)
        #[arg(long)]
        entry_prob: Option<f64>,

        //rng seed for the random strategy and the generated walk
        #[arg(long, default_value = "42")]
        seed: u64,

        //output options
        //output path for trades csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            bars,
            strategy,
            initial_balance,
            risk_per_trade,
            risk_to_reward,
            stop_loss_ticks,
            max_position_size,
            tick_size,
            tick_value,
            tie_break,
            sma_window,
            rsi_period,
            rsi_entry,
            cooldown_bars,
            entry_prob,
            seed,
            output_trades_csv,
            output_equity_csv,
        } => {
            let risk = RiskParameters {
                risk_per_trade,
                risk_to_reward,
                stop_loss_ticks,
                max_position_size,
                tick_size,
                tick_value,
            };

            let tie_break = TieBreak::parse(&tie_break)
                .ok_or_else(|| anyhow::anyhow!("Unknown tie-break policy: {}", tie_break))?;

            let spec = build_strategy_spec(
                &strategy,
                sma_window,
                rsi_period,
                rsi_entry,
                cooldown_bars,
                entry_prob,
                seed,
            );

            let config = BacktestConfiguration {
                data_path: data,
                synthetic_bars: bars,
                initial_balance,
                risk,
                strategy: spec,
                tie_break,
                output_trades_csv,
                output_equity_csv,
            };

            run_backtest(config, seed)?;
        }
    }

    Ok(())
}

//maps cli flags onto a strategy spec; unknown names are passed through
//so the registry rejects them itself
fn build_strategy_spec(
    name: &str,
    sma_window: Option<usize>,
    rsi_period: Option<usize>,
    rsi_entry: Option<f64>,
    cooldown_bars: Option<usize>,
    entry_prob: Option<f64>,
    seed: u64,
) -> StrategySpec {
    let params = match name.to_lowercase().as_str() {
        "sma" | "sma_fallback" => {
            let mut params = SmaFallbackParams::default();
            if let Some(window) = sma_window {
                params.window = window;
            }
            Some(StrategyParams::SmaFallback(params))
        }
        "rsi" | "rsi_reversal" => {
            let mut params = RsiReversalParams::default();
            if let Some(period) = rsi_period {
                params.period = period;
            }
            if let Some(entry) = rsi_entry {
                params.entry_threshold = entry;
            }
            Some(StrategyParams::RsiReversal(params))
        }
        "rsi_cooldown" => {
            let mut params = RsiCooldownParams::default();
            if let Some(period) = rsi_period {
                params.period = period;
            }
            if let Some(entry) = rsi_entry {
                params.entry_threshold = entry;
            }
            if let Some(cooldown) = cooldown_bars {
                params.cooldown_bars = cooldown;
            }
            Some(StrategyParams::RsiCooldown(params))
        }
        "random" | "random_entry" => {
            let mut params = RandomEntryParams {
                seed,
                ..RandomEntryParams::default()
            };
            if let Some(prob) = entry_prob {
                params.entry_prob = prob;
            }
            Some(StrategyParams::RandomEntry(params))
        }
        _ => None,
    };

    StrategySpec::ByName {
        name: name.to_string(),
        params,
    }
}

fn run_backtest(config: BacktestConfiguration, seed: u64) -> Result<()> {
    println!("Pozole Futures Backtesting Engine");
    println!("==================================\n");

    //load or generate data
    let bars = match &config.data_path {
        Some(path) => {
            println!("Loading data from {:?}...", path);
            load_csv(path).context(format!("Failed to load data from {:?}", path))?
        }
        None => {
            println!("No data path given, generating {} random-walk bars (seed {})", config.synthetic_bars, seed);
            random_walk(config.synthetic_bars, seed)
        }
    };

    if bars.is_empty() {
        anyhow::bail!("No bars to backtest");
    }

    println!("Loaded {} bars", bars.len());
    if let (Some(first), Some(last)) = (
        bars.first().and_then(|b| b.timestamp),
        bars.last().and_then(|b| b.timestamp),
    ) {
        println!("Date range: {} to {}", first, last);
    }

    println!(
        "\nContract: tick ${}, value ${} | risk {:.2}% per trade, rr {}, stop {} ticks, max {} contracts",
        config.risk.tick_size,
        config.risk.tick_value,
        config.risk.risk_per_trade * 100.0,
        config.risk.risk_to_reward,
        config.risk.stop_loss_ticks,
        config.risk.max_position_size
    );
    println!("Initial balance: ${:.2}\n", config.initial_balance);

    //run backtest
    println!("Running backtest...\n");
    let output_trades = config.output_trades_csv.clone();
    let output_equity = config.output_equity_csv.clone();
    let engine = BacktestEngine::new(config, bars);
    let result = engine.run()?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    //save outputs if requested
    if let Some(trades_path) = output_trades {
        save_trades_csv(&result.trades, &trades_path)?;
        println!("\nTrades saved to {:?}", trades_path);
    }

    if let Some(equity_path) = output_equity {
        save_equity_csv(&result.equity_curve, &equity_path)?;
        println!("Equity curve saved to {:?}", equity_path);
    }

    Ok(())
}

fn save_trades_csv(trades: &[Trade], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(
        file,
        "entry_index,exit_index,entry_price,exit_price,direction,position_size,realized_pnl,exit_reason"
    )?;

    for trade in trades {
        writeln!(
            file,
            "{},{},{},{},{:?},{},{},{}",
            trade.entry_index,
            trade.exit_index,
            trade.entry_price,
            trade.exit_price,
            trade.direction,
            trade.position_size,
            trade.realized_pnl,
            trade.exit_reason
        )?;
    }

    Ok(())
}

fn save_equity_csv(equity_curve: &[EquityPoint], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "trade_number,timestamp,equity,drawdown")?;

    for point in equity_curve {
        let timestamp = point
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{},{}",
            point.trade_number, timestamp, point.equity, point.drawdown
        )?;
    }

    Ok(())
}
