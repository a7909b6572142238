use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("risk_per_trade must be in (0, 1], got {0}")]
    RiskPerTrade(f64),
    #[error("risk_to_reward must be positive, got {0}")]
    RiskToReward(f64),
    #[error("stop_loss_ticks must be positive, got {0}")]
    StopLossTicks(u32),
    #[error("max_position_size must be at least 1, got {0}")]
    MaxPositionSize(u32),
    #[error("tick_size must be positive, got {0}")]
    TickSize(f64),
    #[error("tick_value must be positive, got {0}")]
    TickValue(f64),
    #[error("initial_balance must be positive, got {0}")]
    InitialBalance(f64),
}

//risk and contract parameters shared by the sizer, the strategies and
//the simulator; validated once before a run, never re-checked in the
//hot loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskParameters {
    //fraction of the balance risked per trade
    pub risk_per_trade: f64,

    //target distance as a multiple of the stop distance
    pub risk_to_reward: f64,

    //default stop distance in ticks, used when a signal carries none
    pub stop_loss_ticks: u32,

    //hard cap on contracts per trade
    pub max_position_size: u32,

    //minimum price fluctuation of the contract
    pub tick_size: f64,

    //dollar value of one tick per contract
    pub tick_value: f64,
}

impl Default for RiskParameters {
    fn default() -> Self {
        //mes-style micro contract defaults
        RiskParameters {
            risk_per_trade: 0.01,
            risk_to_reward: 2.0,
            stop_loss_ticks: 20,
            max_position_size: 10,
            tick_size: 0.25,
            tick_value: 1.25,
        }
    }
}

impl RiskParameters {
    //validates every field; a run must not start on failure
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade <= 1.0) {
            return Err(ConfigError::RiskPerTrade(self.risk_per_trade));
        }
        if self.risk_to_reward <= 0.0 {
            return Err(ConfigError::RiskToReward(self.risk_to_reward));
        }
        if self.stop_loss_ticks == 0 {
            return Err(ConfigError::StopLossTicks(self.stop_loss_ticks));
        }
        if self.max_position_size == 0 {
            return Err(ConfigError::MaxPositionSize(self.max_position_size));
        }
        if self.tick_size <= 0.0 {
            return Err(ConfigError::TickSize(self.tick_size));
        }
        if self.tick_value <= 0.0 {
            return Err(ConfigError::TickValue(self.tick_value));
        }
        Ok(())
    }

    //converts a tick count to a price distance
    pub fn ticks_to_price(&self, ticks: u32) -> f64 {
        ticks as f64 * self.tick_size
    }

    //dollar value of one full point move per contract
    pub fn point_value(&self) -> f64 {
        self.tick_value / self.tick_size
    }

    //realized pnl for a closed trade
    //sign is +1 for long, -1 for short
    pub fn pnl(&self, entry_price: f64, exit_price: f64, sign: i32, size: u32) -> f64 {
        (exit_price - entry_price) * sign as f64 * size as f64 * self.point_value()
    }
}
