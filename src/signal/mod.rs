pub mod indicators;
pub mod random_entry;
pub mod rsi_cooldown;
pub mod rsi_reversal;
pub mod sma_fallback;

use crate::config::{RiskParameters, StrategyParams, StrategySpec};
use crate::data::Bar;
use crate::engine::AccountState;
use crate::execution::OrderIntent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use random_entry::RandomEntrySource;
pub use rsi_cooldown::RsiCooldownSource;
pub use rsi_reversal::RsiReversalSource;
pub use sma_fallback::SmaFallbackSource;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("Strategy '{name}' given parameters for a different strategy")]
    ParamsMismatch { name: String },
}

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Strategy '{strategy}' failed to annotate: {message}")]
    AnnotateFailed { strategy: String, message: String },
    #[error("Annotation count {annotations} does not match bar count {bars}")]
    LengthMismatch { annotations: usize, bars: usize },
}

//per-bar entry directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Flat,
    Long,
    Short,
}

impl Direction {
    //converts to price-move sign (Long = +1, Short = -1, Flat = 0)
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Flat => 0,
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Direction::Flat)
    }
}

//one annotation per bar, produced by a SignalSource and consumed once
//by the simulator; explicit levels override the configured defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SignalAnnotation {
    pub direction: Direction,
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    pub stop_loss_ticks: Option<u32>,
}

impl SignalAnnotation {
    pub fn flat() -> Self {
        SignalAnnotation::default()
    }

    pub fn entry(direction: Direction) -> Self {
        SignalAnnotation {
            direction,
            ..SignalAnnotation::default()
        }
    }
}

//signal generation contract every strategy implements
//`annotate` must be deterministic for pinned bars and a pinned seed;
//`on_tick` is a streaming hook reserved for live reuse and unused by
//the backtest core
pub trait SignalSource: std::fmt::Debug {
    fn name(&self) -> &str;

    fn annotate(
        &self,
        bars: &[Bar],
        params: &RiskParameters,
    ) -> Result<Vec<SignalAnnotation>, SignalError>;

    fn on_tick(&mut self, bar: &Bar, account: &AccountState) -> Option<OrderIntent> {
        let _ = (bar, account);
        None
    }
}

//resolves a strategy spec into a concrete source, exactly once at
//construction; an unknown name is an error, never a silent fallback
pub fn resolve(spec: &StrategySpec) -> Result<Box<dyn SignalSource>, StrategyError> {
    match spec {
        StrategySpec::Inline(params) => Ok(from_params(params.clone())),
        StrategySpec::ByName { name, params } => {
            let params = match (name.to_lowercase().as_str(), params.clone()) {
                ("sma" | "sma_fallback", None) => StrategyParams::SmaFallback(Default::default()),
                ("sma" | "sma_fallback", Some(p @ StrategyParams::SmaFallback(_))) => p,
                ("rsi" | "rsi_reversal", None) => StrategyParams::RsiReversal(Default::default()),
                ("rsi" | "rsi_reversal", Some(p @ StrategyParams::RsiReversal(_))) => p,
                ("rsi_cooldown", None) => StrategyParams::RsiCooldown(Default::default()),
                ("rsi_cooldown", Some(p @ StrategyParams::RsiCooldown(_))) => p,
                ("random" | "random_entry", None) => StrategyParams::RandomEntry(Default::default()),
                ("random" | "random_entry", Some(p @ StrategyParams::RandomEntry(_))) => p,
                ("sma" | "sma_fallback" | "rsi" | "rsi_reversal" | "rsi_cooldown" | "random"
                | "random_entry", Some(_)) => {
                    return Err(StrategyError::ParamsMismatch { name: name.clone() })
                }
                _ => return Err(StrategyError::UnknownStrategy(name.clone())),
            };
            Ok(from_params(params))
        }
    }
}

fn from_params(params: StrategyParams) -> Box<dyn SignalSource> {
    match params {
        StrategyParams::SmaFallback(p) => Box::new(SmaFallbackSource::new(p)),
        StrategyParams::RsiReversal(p) => Box::new(RsiReversalSource::new(p)),
        StrategyParams::RsiCooldown(p) => Box::new(RsiCooldownSource::new(p)),
        StrategyParams::RandomEntry(p) => Box::new(RandomEntrySource::new(p)),
    }
}
