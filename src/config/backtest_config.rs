use crate::config::risk::{ConfigError, RiskParameters};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//same-bar stop-vs-target tie-break policy
//ohlc data cannot disambiguate true intrabar order, so when both
//levels are crossed on one bar the choice is a rule, not a deduction;
//stop-first is the conservative default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TieBreak {
    #[default]
    StopFirst,
    TargetFirst,
}

impl TieBreak {
    //parse tie-break policy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stop" | "stop_first" => Some(TieBreak::StopFirst),
            "target" | "target_first" => Some(TieBreak::TargetFirst),
            _ => None,
        }
    }
}

//sma fallback strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmaFallbackParams {
    pub window: usize,
}

impl Default for SmaFallbackParams {
    fn default() -> Self {
        SmaFallbackParams { window: 5 }
    }
}

//rsi reversal strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RsiReversalParams {
    pub period: usize,
    pub entry_threshold: f64,
    //per-strategy stop override; falls back to RiskParameters when None
    pub stop_loss_ticks: Option<u32>,
}

impl Default for RsiReversalParams {
    fn default() -> Self {
        RsiReversalParams {
            period: 14,
            entry_threshold: 30.0,
            stop_loss_ticks: None,
        }
    }
}

//rsi reversal with post-stop-loss cooldown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RsiCooldownParams {
    pub period: usize,
    pub entry_threshold: f64,
    pub cooldown_bars: usize,
    pub stop_loss_ticks: Option<u32>,
}

impl Default for RsiCooldownParams {
    fn default() -> Self {
        RsiCooldownParams {
            period: 14,
            entry_threshold: 30.0,
            cooldown_bars: 10,
            stop_loss_ticks: None,
        }
    }
}

//seeded random entry generator parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomEntryParams {
    pub entry_prob: f64,
    pub seed: u64,
}

impl Default for RandomEntryParams {
    fn default() -> Self {
        RandomEntryParams {
            entry_prob: 0.02,
            seed: 42,
        }
    }
}

//strategy-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StrategyParams {
    SmaFallback(SmaFallbackParams),
    RsiReversal(RsiReversalParams),
    RsiCooldown(RsiCooldownParams),
    RandomEntry(RandomEntryParams),
}

//how a run names its strategy: either a registry identifier with
//optional explicit params, or inline params that fix the variant
//outright; resolved exactly once at construction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StrategySpec {
    ByName {
        name: String,
        params: Option<StrategyParams>,
    },
    Inline(StrategyParams),
}

impl StrategySpec {
    pub fn by_name(name: &str) -> Self {
        StrategySpec::ByName {
            name: name.to_string(),
            params: None,
        }
    }
}

//complete backtest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //csv data path; a seeded random walk is generated when absent
    pub data_path: Option<PathBuf>,

    //bar count for the generated walk when no data path is given
    pub synthetic_bars: usize,

    //account settings
    pub initial_balance: f64,

    //risk and contract parameters
    pub risk: RiskParameters,

    //strategy selection
    pub strategy: StrategySpec,

    //same-bar exit tie-break policy
    pub tie_break: TieBreak,

    //optional output paths
    pub output_trades_csv: Option<PathBuf>,
    pub output_equity_csv: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: None,
            synthetic_bars: 10000,
            initial_balance: 10000.0,
            risk: RiskParameters::default(),
            strategy: StrategySpec::by_name("random_entry"),
            tie_break: TieBreak::StopFirst,
            output_trades_csv: None,
            output_equity_csv: None,
        }
    }
}

impl BacktestConfiguration {
    //validates the configuration before a run starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance <= 0.0 {
            return Err(ConfigError::InitialBalance(self.initial_balance));
        }
        self.risk.validate()
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
