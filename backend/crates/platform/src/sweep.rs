//! Expired-entry sweep cadence
//!
//! In-memory stores accumulate dead entries until something deletes
//! them. Two cadences are supported:
//!
//! - [`SweepCadence::Periodic`]: a timer task owned by the application
//!   calls `purge_expired` at a fixed interval (the default).
//! - [`SweepCadence::Opportunistic`]: each write rolls a die and sweeps
//!   inline with the given probability, trading predictable memory
//!   bounds for zero background work.

use std::time::Duration;

/// When expired entries get purged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepCadence {
    /// Swept by an application-owned timer task at this interval
    Periodic(Duration),
    /// Swept inline on a random fraction of writes (0.0..=1.0)
    Opportunistic(f64),
}

impl Default for SweepCadence {
    fn default() -> Self {
        SweepCadence::Periodic(Duration::from_secs(600))
    }
}

impl SweepCadence {
    /// Whether a write under this cadence should sweep inline right now
    pub fn should_sweep_inline(&self) -> bool {
        match self {
            SweepCadence::Periodic(_) => false,
            SweepCadence::Opportunistic(probability) => rand::random::<f64>() < *probability,
        }
    }

    /// Timer interval, when the cadence is periodic
    pub fn interval(&self) -> Option<Duration> {
        match self {
            SweepCadence::Periodic(interval) => Some(*interval),
            SweepCadence::Opportunistic(_) => None,
        }
    }
}
