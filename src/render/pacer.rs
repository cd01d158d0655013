//! Adaptive pacing of the per-cycle pixel budget
//!
//! Proportional controller: the batch is scaled by `target / measured`,
//! limited to a growth or shrink of `1 + max_change` per cycle.
//! The batch size itself lives in the caller.

use std::time::Duration;

/// Cycle duration the render loop aims for
pub const CYCLE_PERIOD_TARGET: Duration = Duration::from_millis(100);

/// Pixels per cycle before the first measurement
pub const INITIAL_BATCH: u64 = 10;

/// 0.5 allows 50% growth or shrinkage per cycle
pub const MAX_CHANGE_PER_CYCLE: f64 = 0.5;

/// Next batch size given how long the last batch took
pub fn adjust(batch_size: u64, measured: Duration, target: Duration, max_ratio: f64) -> u64 {
    let change_max = 1.0 + max_ratio.max(0.0);
    let change_min = 1.0 / change_max;

    let measured_s = measured.as_secs_f64();
    let factor = if measured_s == 0.0 {
        // Too fast to measure: grow as much as allowed
        change_max
    } else {
        (target.as_secs_f64() / measured_s).clamp(change_min, change_max)
    };

    let next = (batch_size as f64 * factor).round() as u64;
    next.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacerSettings {
    pub target: Duration, // desired cycle duration
    pub max_change: f64, // max relative change per cycle
    pub initial_batch: u64, // first batch size
}

impl Default for PacerSettings {
    fn default() -> Self {
        Self {
            target: CYCLE_PERIOD_TARGET,
            max_change: MAX_CHANGE_PER_CYCLE,
            initial_batch: INITIAL_BATCH,
        }
    }
}

impl PacerSettings {
    pub fn adjust(&self, batch_size: u64, measured: Duration) -> u64 {
        adjust(batch_size, measured, self.target, self.max_change)
    }
}
