//! Game clock: countdown per period, run/pause flag, presentation
//! speed.
//!
//! The clock is passive. An external driver calls [`GameClock::tick`]
//! once per simulated second at a real cadence of
//! `BASE_TICK_INTERVAL_MS / speed` and feeds elapsed real time into
//! [`GameClock::advance_real`] for the intermission rule. The speed
//! multiplier changes only the recommended cadence, never the amount
//! decremented per tick, so simulated-time semantics are independent
//! of presentation speed.

use serde::{Deserialize, Serialize};

pub const PERIOD_SECONDS: u32 = 1200;
pub const PERIOD_COUNT: u8 = 3;
pub const MATCH_SECONDS: u32 = PERIOD_SECONDS * PERIOD_COUNT as u32;

/// Real milliseconds between ticks at 1x speed.
pub const BASE_TICK_INTERVAL_MS: u64 = 1000;

/// Real-time pause between periods before the next one starts.
pub const INTERMISSION_MS: u64 = 2000;

/// Presentation speed. Cycles through a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMultiplier {
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl SpeedMultiplier {
    pub fn factor(&self) -> u64 {
        match self {
            SpeedMultiplier::X1 => 1,
            SpeedMultiplier::X2 => 2,
            SpeedMultiplier::X4 => 4,
            SpeedMultiplier::X8 => 8,
            SpeedMultiplier::X16 => 16,
        }
    }

    pub fn cycled(&self) -> SpeedMultiplier {
        match self {
            SpeedMultiplier::X1 => SpeedMultiplier::X2,
            SpeedMultiplier::X2 => SpeedMultiplier::X4,
            SpeedMultiplier::X4 => SpeedMultiplier::X8,
            SpeedMultiplier::X8 => SpeedMultiplier::X16,
            SpeedMultiplier::X16 => SpeedMultiplier::X1,
        }
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        SpeedMultiplier::X1
    }
}

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock not running; nothing happened.
    Idle,
    /// One simulated second elapsed.
    Advanced,
    /// One simulated second elapsed and the period hit zero.
    PeriodExpired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    period: u8,
    seconds_remaining: u32,
    running: bool,
    speed: SpeedMultiplier,
    /// Real milliseconds left of the current intermission, if one is
    /// in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    intermission_remaining_ms: Option<u64>,
    match_over: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            period: 1,
            seconds_remaining: PERIOD_SECONDS,
            running: false,
            speed: SpeedMultiplier::default(),
            intermission_remaining_ms: None,
            match_over: false,
        }
    }

    pub fn period(&self) -> u8 {
        self.period
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_match_over(&self) -> bool {
        self.match_over
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    pub fn cycle_speed(&mut self) {
        self.speed = self.speed.cycled();
    }

    /// Recommended real interval between driver ticks at the current
    /// speed.
    pub fn tick_interval_ms(&self) -> u64 {
        BASE_TICK_INTERVAL_MS / self.speed.factor()
    }

    /// Seconds since the opening puck drop, monotonic non-decreasing
    /// over the whole match (0..=3600).
    pub fn match_time(&self) -> u32 {
        let elapsed = PERIOD_SECONDS.saturating_sub(self.seconds_remaining.min(PERIOD_SECONDS));
        ((self.period.min(PERIOD_COUNT) as u32 - 1) * PERIOD_SECONDS + elapsed).min(MATCH_SECONDS)
    }

    pub fn start(&mut self) {
        if !self.match_over {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.match_over && self.intermission_remaining_ms.is_none() {
            self.running = true;
        }
    }

    /// Advance one simulated second. Decrements by exactly 1 while
    /// running; out-of-range values are clamped to 0 before the
    /// comparison logic runs.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.match_over {
            return TickOutcome::Idle;
        }

        self.seconds_remaining = self.seconds_remaining.min(PERIOD_SECONDS);
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);

        if self.seconds_remaining == 0 {
            self.running = false;
            if self.period >= PERIOD_COUNT {
                self.match_over = true;
            } else {
                self.intermission_remaining_ms = Some(INTERMISSION_MS);
            }
            TickOutcome::PeriodExpired
        } else {
            TickOutcome::Advanced
        }
    }

    /// Feed elapsed real time into the intermission rule. Returns the
    /// new period number when an intermission just finished.
    ///
    /// The reset lands on 1199 ("second 1 of the period has already
    /// elapsed") so the immediately following tick crosses the
    /// opening-faceoff trigger.
    pub fn advance_real(&mut self, elapsed_ms: u64) -> Option<u8> {
        let remaining = self.intermission_remaining_ms?;
        if elapsed_ms < remaining {
            self.intermission_remaining_ms = Some(remaining - elapsed_ms);
            return None;
        }

        self.intermission_remaining_ms = None;
        self.period += 1;
        self.seconds_remaining = PERIOD_SECONDS - 1;
        self.running = true;
        Some(self.period)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_period_out(clock: &mut GameClock) {
        while clock.is_running() {
            clock.tick();
        }
    }

    #[test]
    fn test_tick_decrements_one_second() {
        let mut clock = GameClock::new();
        clock.start();
        assert_eq!(clock.tick(), TickOutcome::Advanced);
        assert_eq!(clock.seconds_remaining(), PERIOD_SECONDS - 1);
        assert_eq!(clock.match_time(), 1);
    }

    #[test]
    fn test_idle_when_not_running() {
        let mut clock = GameClock::new();
        assert_eq!(clock.tick(), TickOutcome::Idle);
        assert_eq!(clock.seconds_remaining(), PERIOD_SECONDS);
    }

    #[test]
    fn test_speed_changes_interval_not_decrement() {
        let mut clock = GameClock::new();
        clock.start();
        assert_eq!(clock.tick_interval_ms(), 1000);
        clock.cycle_speed();
        assert_eq!(clock.speed(), SpeedMultiplier::X2);
        assert_eq!(clock.tick_interval_ms(), 500);
        clock.tick();
        // Still exactly one simulated second per tick.
        assert_eq!(clock.seconds_remaining(), PERIOD_SECONDS - 1);
    }

    #[test]
    fn test_speed_cycle_wraps() {
        let mut speed = SpeedMultiplier::X1;
        let mut seen = vec![];
        for _ in 0..5 {
            seen.push(speed.factor());
            speed = speed.cycled();
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16]);
        assert_eq!(speed, SpeedMultiplier::X1);
    }

    #[test]
    fn test_period_expiry_stops_clock_and_arms_intermission() {
        let mut clock = GameClock::new();
        clock.start();
        run_period_out(&mut clock);
        assert_eq!(clock.seconds_remaining(), 0);
        assert!(!clock.is_running());
        assert!(!clock.is_match_over());
        assert_eq!(clock.match_time(), PERIOD_SECONDS);

        // Resume is a no-op during intermission.
        clock.resume();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_intermission_rolls_into_next_period() {
        let mut clock = GameClock::new();
        clock.start();
        run_period_out(&mut clock);

        assert_eq!(clock.advance_real(500), None);
        assert_eq!(clock.advance_real(1500), Some(2));
        assert_eq!(clock.period(), 2);
        assert_eq!(clock.seconds_remaining(), PERIOD_SECONDS - 1);
        assert!(clock.is_running());
        assert_eq!(clock.match_time(), PERIOD_SECONDS + 1);
    }

    #[test]
    fn test_third_period_expiry_ends_match() {
        let mut clock = GameClock::new();
        clock.start();
        for _ in 0..2 {
            run_period_out(&mut clock);
            clock.advance_real(INTERMISSION_MS);
        }
        run_period_out(&mut clock);

        assert!(clock.is_match_over());
        assert_eq!(clock.match_time(), MATCH_SECONDS);
        assert_eq!(clock.advance_real(10_000), None);
        clock.start();
        assert_eq!(clock.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_match_time_monotonic_across_full_match() {
        let mut clock = GameClock::new();
        clock.start();
        let mut last = clock.match_time();
        loop {
            match clock.tick() {
                TickOutcome::Idle => {
                    if clock.is_match_over() {
                        break;
                    }
                    clock.advance_real(INTERMISSION_MS);
                }
                _ => {
                    let now = clock.match_time();
                    assert!(now >= last);
                    assert!(now <= MATCH_SECONDS);
                    last = now;
                }
            }
        }
        assert_eq!(last, MATCH_SECONDS);
    }
}
