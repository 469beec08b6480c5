//! Delay providers for the question pause and the visual reveal

use crate::config::TimingConfig;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Source of the two narration delays. Drawn fresh for every narration.
pub trait DelaySource: Send + Sync {
    /// Pause between the end of the question and the start of the answer
    fn question_pause(&self) -> Duration;

    /// Delay between the start of the answer and the visual reveal
    fn reveal_delay(&self) -> Duration;
}

/// Uniformly random delays from the thread-local RNG (unseeded)
#[derive(Debug, Clone)]
pub struct UniformDelays {
    pause_ms: RangeInclusive<u64>,
    reveal_ms: RangeInclusive<u64>,
}

impl UniformDelays {
    pub fn new(pause_ms: RangeInclusive<u64>, reveal_ms: RangeInclusive<u64>) -> Self {
        Self { pause_ms, reveal_ms }
    }
}

impl Default for UniformDelays {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for UniformDelays {
    fn from(cfg: &TimingConfig) -> Self {
        Self::new(
            cfg.pause_min_ms..=cfg.pause_max_ms,
            cfg.reveal_min_ms..=cfg.reveal_max_ms,
        )
    }
}

fn draw(range: &RangeInclusive<u64>) -> Duration {
    let (lo, hi) = (*range.start(), *range.end());
    if lo >= hi {
        return Duration::from_millis(lo);
    }
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

impl DelaySource for UniformDelays {
    fn question_pause(&self) -> Duration {
        draw(&self.pause_ms)
    }

    fn reveal_delay(&self) -> Duration {
        draw(&self.reveal_ms)
    }
}

/// Constant delays, for deterministic runs
#[derive(Debug, Clone, Copy)]
pub struct FixedDelays {
    pub pause: Duration,
    pub reveal: Duration,
}

impl FixedDelays {
    pub fn new(pause: Duration, reveal: Duration) -> Self {
        Self { pause, reveal }
    }
}

impl DelaySource for FixedDelays {
    fn question_pause(&self) -> Duration {
        self.pause
    }

    fn reveal_delay(&self) -> Duration {
        self.reveal
    }
}
