use crate::config::{RiskParameters, RsiCooldownParams};
use crate::data::Bar;
use crate::signal::indicators::rsi_series;
use crate::signal::rsi_reversal::long_entry;
use crate::signal::{SignalAnnotation, SignalError, SignalSource};

//rsi reversal with a post-stop-loss cooldown window
//after an entry whose resolution is a stop-loss hit, new entries are
//suppressed for `cooldown_bars` bars past the exit; the source replays
//the simulator's own stop-before-target forward scan so the window
//lines up with the exits the simulator will actually produce
#[derive(Debug, Clone)]
pub struct RsiCooldownSource {
    params: RsiCooldownParams,
}

enum Resolution {
    StopHit(usize),
    TargetHit(usize),
    EndOfData,
}

impl RsiCooldownSource {
    pub fn new(params: RsiCooldownParams) -> Self {
        RsiCooldownSource { params }
    }

    fn stop_ticks(&self, params: &RiskParameters) -> u32 {
        self.params.stop_loss_ticks.unwrap_or(params.stop_loss_ticks)
    }

    //forward-scans a long entry the way the simulator does, assuming
    //the stop-first tie-break
    fn resolve_long(bars: &[Bar], entry_index: usize, stop: f64, target: f64) -> Resolution {
        for (j, bar) in bars.iter().enumerate().skip(entry_index + 1) {
            if bar.low <= stop {
                return Resolution::StopHit(j);
            }
            if bar.high >= target {
                return Resolution::TargetHit(j);
            }
        }
        Resolution::EndOfData
    }
}

impl SignalSource for RsiCooldownSource {
    fn name(&self) -> &str {
        "rsi_cooldown"
    }

    fn annotate(
        &self,
        bars: &[Bar],
        params: &RiskParameters,
    ) -> Result<Vec<SignalAnnotation>, SignalError> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let rsi = rsi_series(&closes, self.params.period);
        let stop_ticks = self.stop_ticks(params);

        let mut annotations = vec![SignalAnnotation::flat(); bars.len()];
        //entries are allowed from this index onward
        let mut allowed_from = 0usize;

        for i in 0..bars.len() {
            if i < allowed_from {
                continue;
            }

            let oversold = matches!(rsi[i], Some(v) if v < self.params.entry_threshold);
            if !oversold {
                continue;
            }

            let entry = long_entry(bars[i].close, stop_ticks, params);
            let stop = entry.stop_price.unwrap_or(bars[i].close);
            let target = entry.target_price.unwrap_or(bars[i].close);
            annotations[i] = entry;

            //suppress further entries while the position is open, plus
            //the cooldown window when the exit was a stop loss
            allowed_from = match Self::resolve_long(bars, i, stop, target) {
                Resolution::StopHit(j) => j + 1 + self.params.cooldown_bars,
                Resolution::TargetHit(j) => j + 1,
                Resolution::EndOfData => bars.len(),
            };
        }

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Direction;

    //declines until an entry fires, crashes through the stop, then
    //keeps declining so the rsi stays oversold
    fn crash_bars() -> Vec<Bar> {
        (0..60).map(|i| Bar::flat(500.0 - 2.0 * i as f64)).collect()
    }

    #[test]
    fn entries_suppressed_after_stop_loss() {
        let params = RiskParameters::default();
        let cooldown = 10;
        let source = RsiCooldownSource::new(RsiCooldownParams {
            cooldown_bars: cooldown,
            ..RsiCooldownParams::default()
        });

        let bars = crash_bars();
        let annotations = source.annotate(&bars, &params).unwrap();

        let entries: Vec<usize> = annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.direction == Direction::Long)
            .map(|(i, _)| i)
            .collect();
        assert!(entries.len() >= 2, "fixture should produce repeat entries");

        //every stop exit must be followed by a quiet window
        for window in entries.windows(2) {
            let (first, second) = (window[0], window[1]);
            let stop = annotations[first].stop_price.unwrap();
            let exit = (first + 1..bars.len())
                .find(|&j| bars[j].low <= stop)
                .expect("crash fixture always hits the stop");
            assert!(
                second > exit + cooldown,
                "entry at {} inside cooldown after stop exit at {}",
                second,
                exit
            );
        }
    }

    #[test]
    fn no_overlapping_entries_while_position_open() {
        let params = RiskParameters::default();
        let source = RsiCooldownSource::new(RsiCooldownParams {
            cooldown_bars: 0,
            ..RsiCooldownParams::default()
        });

        let bars = crash_bars();
        let annotations = source.annotate(&bars, &params).unwrap();

        let mut last_exit = None::<usize>;
        for (i, annotation) in annotations.iter().enumerate() {
            if annotation.direction.is_flat() {
                continue;
            }
            if let Some(exit) = last_exit {
                assert!(i > exit, "entry at {} overlaps trade exiting at {}", i, exit);
            }
            let stop = annotation.stop_price.unwrap();
            last_exit = (i + 1..bars.len()).find(|&j| bars[j].low <= stop);
        }
    }

    #[test]
    fn deterministic_for_pinned_bars() {
        let params = RiskParameters::default();
        let source = RsiCooldownSource::new(RsiCooldownParams::default());
        let bars = crash_bars();
        let a = source.annotate(&bars, &params).unwrap();
        let b = source.annotate(&bars, &params).unwrap();
        assert_eq!(a, b);
    }
}
