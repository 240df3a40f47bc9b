//! Randomized pause between dork searches

use crate::error::ConfigError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Number of pre-generated delays
pub const POOL_SIZE: usize = 20;

/// Sorted pool of delays (seconds, one decimal) a run picks from between dorks
#[derive(Debug, Clone, PartialEq)]
pub struct DelayPool {
    delays: Vec<f64>,
}

impl DelayPool {
    /// Draw [`POOL_SIZE`] uniform delays in `[min, max]`.
    ///
    /// Values are rounded to one decimal, then clamped so rounding can't
    /// push them outside the bounds.
    pub fn build(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min < 0.0 {
            return Err(ConfigError::NegativeDelay("minimum_delay"));
        }
        if max <= min {
            return Err(ConfigError::DelayBounds { min, max });
        }

        let mut rng = rand::thread_rng();
        let mut delays: Vec<f64> = (0..POOL_SIZE)
            .map(|_| {
                let sample = rng.gen_range(min..=max);
                ((sample * 10.0).round() / 10.0).clamp(min, max)
            })
            .collect();
        delays.sort_by(f64::total_cmp);

        Ok(Self { delays })
    }

    /// Pick one delay at random from the pool
    pub fn next_delay(&self) -> Duration {
        let seconds = self
            .delays
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        Duration::from_secs_f64(seconds)
    }

    pub fn values(&self) -> &[f64] {
        &self.delays
    }
}
