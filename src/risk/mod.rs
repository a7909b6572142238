use crate::config::RiskParameters;

//fixed fractional-risk position sizer
//contracts = floor(balance * risk_per_trade / (stop_loss_ticks * tick_value)),
//clamped to [1, max_position_size]
//the floor at one contract is a minimum-exposure policy: on very small
//balances the true risk fraction may exceed risk_per_trade
//non-positive stop_loss_ticks is rejected by config validation before
//any run, so the sizer itself carries no error path
#[derive(Debug, Clone)]
pub struct PositionSizer {
    risk_per_trade: f64,
    max_position_size: u32,
}

impl PositionSizer {
    pub fn new(params: &RiskParameters) -> Self {
        PositionSizer {
            risk_per_trade: params.risk_per_trade,
            max_position_size: params.max_position_size,
        }
    }

    //bounded contract count for the next trade
    pub fn size(&self, balance: f64, stop_loss_ticks: u32, tick_value: f64) -> u32 {
        let risk_amount = balance * self.risk_per_trade;
        let stop_value = stop_loss_ticks as f64 * tick_value;
        let contracts = (risk_amount / stop_value).floor();

        if contracts < 1.0 {
            return 1;
        }
        (contracts as u32).min(self.max_position_size)
    }
}
