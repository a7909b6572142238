use crate::config::{RiskParameters, SmaFallbackParams};
use crate::data::Bar;
use crate::signal::indicators::sma_series;
use crate::signal::{Direction, SignalAnnotation, SignalError, SignalSource};

//moving-average fallback source
//long while the close sits above its rolling mean, short while below;
//carries no explicit levels, so the simulator applies the configured
//stop distance and risk-to-reward symmetry
#[derive(Debug, Clone)]
pub struct SmaFallbackSource {
    params: SmaFallbackParams,
}

impl SmaFallbackSource {
    pub fn new(params: SmaFallbackParams) -> Self {
        SmaFallbackSource { params }
    }
}

impl SignalSource for SmaFallbackSource {
    fn name(&self) -> &str {
        "sma_fallback"
    }

    fn annotate(
        &self,
        bars: &[Bar],
        _params: &RiskParameters,
    ) -> Result<Vec<SignalAnnotation>, SignalError> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let sma = sma_series(&closes, self.params.window);

        let annotations = bars
            .iter()
            .zip(sma.iter())
            .map(|(bar, mean)| match mean {
                Some(mean) if bar.close > *mean => SignalAnnotation::entry(Direction::Long),
                Some(mean) if bar.close < *mean => SignalAnnotation::entry(Direction::Short),
                _ => SignalAnnotation::flat(),
            })
            .collect();

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes.iter().map(|&c| Bar::flat(c)).collect()
    }

    #[test]
    fn flat_until_window_fills() {
        let bars = bars_from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let source = SmaFallbackSource::new(SmaFallbackParams { window: 5 });
        let annotations = source.annotate(&bars, &RiskParameters::default()).unwrap();

        for annotation in &annotations[..4] {
            assert!(annotation.direction.is_flat());
        }
        //rising closes sit above the mean
        assert_eq!(annotations[5].direction, Direction::Long);
    }

    #[test]
    fn falling_closes_go_short() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let bars = bars_from_closes(&closes);
        let source = SmaFallbackSource::new(SmaFallbackParams { window: 5 });
        let annotations = source.annotate(&bars, &RiskParameters::default()).unwrap();

        assert_eq!(annotations[9].direction, Direction::Short);
    }

    #[test]
    fn no_explicit_levels() {
        let bars = bars_from_closes(&[100.0; 10]);
        let source = SmaFallbackSource::new(SmaFallbackParams::default());
        let annotations = source.annotate(&bars, &RiskParameters::default()).unwrap();
        assert!(annotations.iter().all(|a| a.stop_price.is_none()
            && a.target_price.is_none()
            && a.stop_loss_ticks.is_none()));
    }
}
