//! Fixed-timestep game clock using an accumulator pattern.
//!
//! `draw_web()` fires at display rate with a variable delta. `GameTime`
//! turns that into whole game ticks so cooldowns, the auto-clicker interval,
//! and toast lifetimes are all integer tick counts and testable without a
//! browser.

/// Longest wall-clock gap consumed in one frame. A backgrounded tab resumes
/// with at most this much catch-up.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Timestamp of the previous frame, None before the first frame.
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()`) and get back
    /// the number of ticks to simulate this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// Convert a millisecond duration to ticks, rounding up so a non-zero
/// duration never collapses to zero ticks.
pub fn ms_to_ticks(ms: u32, ticks_per_sec: u32) -> u32 {
    if ms == 0 {
        return 0;
    }
    let tps = ticks_per_sec.max(1) as u64;
    ((ms as u64 * tps).div_ceil(1000)).max(1) as u32
}
