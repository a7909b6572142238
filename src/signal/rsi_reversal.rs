use crate::config::{RiskParameters, RsiReversalParams};
use crate::data::Bar;
use crate::signal::indicators::rsi_series;
use crate::signal::{Direction, SignalAnnotation, SignalError, SignalSource};

//rsi threshold reversal source
//goes long when rsi dips below the entry threshold, betting on a snap
//back; writes explicit stop/target levels so the simulator does not
//have to re-derive them
#[derive(Debug, Clone)]
pub struct RsiReversalSource {
    params: RsiReversalParams,
}

impl RsiReversalSource {
    pub fn new(params: RsiReversalParams) -> Self {
        RsiReversalSource { params }
    }

    fn stop_ticks(&self, params: &RiskParameters) -> u32 {
        self.params.stop_loss_ticks.unwrap_or(params.stop_loss_ticks)
    }
}

//builds a long entry annotation with symmetric tick-based levels
pub(crate) fn long_entry(
    entry_price: f64,
    stop_ticks: u32,
    params: &RiskParameters,
) -> SignalAnnotation {
    let stop_distance = params.ticks_to_price(stop_ticks);
    SignalAnnotation {
        direction: Direction::Long,
        stop_price: Some(entry_price - stop_distance),
        target_price: Some(entry_price + stop_distance * params.risk_to_reward),
        stop_loss_ticks: Some(stop_ticks),
    }
}

impl SignalSource for RsiReversalSource {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn annotate(
        &self,
        bars: &[Bar],
        params: &RiskParameters,
    ) -> Result<Vec<SignalAnnotation>, SignalError> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let rsi = rsi_series(&closes, self.params.period);
        let stop_ticks = self.stop_ticks(params);

        let annotations = bars
            .iter()
            .zip(rsi.iter())
            .map(|(bar, rsi)| match rsi {
                Some(value) if *value < self.params.entry_threshold => {
                    long_entry(bar.close, stop_ticks, params)
                }
                _ => SignalAnnotation::flat(),
            })
            .collect();

        Ok(annotations)
    }
}
