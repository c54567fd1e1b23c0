//! Simulation clock: converts real seconds into simulated days.

use crate::bodies::DAYS_PER_SECOND;

/// Largest magnitude accepted by [`SimClock::set_speed`], in days per second.
pub const MAX_SPEED: f64 = 3650.0;

/// Multiplier applied by speed up / slow down.
pub const SPEED_STEP: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    days_per_second: f64,
    paused: bool,
    elapsed_days: f64,
}

impl SimClock {
    pub fn new(days_per_second: f64) -> Self {
        let mut clock = Self {
            days_per_second: DAYS_PER_SECOND,
            paused: false,
            elapsed_days: 0.0,
        };
        clock.set_speed(days_per_second);
        clock
    }

    /// Advance by `real_dt` seconds and return the simulated days that passed.
    /// Paused clocks return 0.
    pub fn tick(&mut self, real_dt: f64) -> f64 {
        if self.paused || !real_dt.is_finite() || real_dt <= 0.0 {
            return 0.0;
        }
        let days = real_dt * self.days_per_second;
        self.elapsed_days += days;
        days
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Set days per second. Non-finite values are ignored; others are clamped
    /// to ±[`MAX_SPEED`]. Negative speeds run the system backwards.
    pub fn set_speed(&mut self, days_per_second: f64) {
        if !days_per_second.is_finite() {
            log::debug!("clock: ignoring speed {}", days_per_second);
            return;
        }
        self.days_per_second = days_per_second.clamp(-MAX_SPEED, MAX_SPEED);
    }

    pub fn speed_up(&mut self) {
        self.set_speed(self.days_per_second * SPEED_STEP);
    }

    pub fn slow_down(&mut self) {
        self.set_speed(self.days_per_second / SPEED_STEP);
    }

    /// Zero elapsed time and unpause; speed is kept.
    pub fn reset(&mut self) {
        self.elapsed_days = 0.0;
        self.paused = false;
    }

    pub fn days_per_second(&self) -> f64 {
        self.days_per_second
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_days(&self) -> f64 {
        self.elapsed_days
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DAYS_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_tick_at_default_speed() {
        let mut clock = SimClock::default();
        let days = clock.tick(1.0 / 60.0);
        assert!((days - 0.5).abs() < 1e-12);
        assert!((clock.elapsed_days() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn paused_clock_yields_nothing() {
        let mut clock = SimClock::default();
        clock.toggle_pause();
        assert_eq!(clock.tick(1.0), 0.0);
        assert_eq!(clock.elapsed_days(), 0.0);
        clock.toggle_pause();
        assert_eq!(clock.tick(1.0), 30.0);
    }

    #[test]
    fn bad_real_dt_is_ignored() {
        let mut clock = SimClock::default();
        assert_eq!(clock.tick(-1.0), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.elapsed_days(), 0.0);
    }

    #[test]
    fn speed_is_clamped() {
        let mut clock = SimClock::default();
        clock.set_speed(1e9);
        assert_eq!(clock.days_per_second(), MAX_SPEED);
        clock.set_speed(-1e9);
        assert_eq!(clock.days_per_second(), -MAX_SPEED);
        clock.set_speed(f64::NAN);
        assert_eq!(clock.days_per_second(), -MAX_SPEED);
    }

    #[test]
    fn speed_steps() {
        let mut clock = SimClock::default();
        clock.speed_up();
        assert_eq!(clock.days_per_second(), 60.0);
        clock.slow_down();
        clock.slow_down();
        assert_eq!(clock.days_per_second(), 15.0);
    }

    #[test]
    fn reset_keeps_speed() {
        let mut clock = SimClock::new(10.0);
        clock.tick(2.0);
        clock.set_paused(true);
        clock.reset();
        assert_eq!(clock.elapsed_days(), 0.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.days_per_second(), 10.0);
    }
}
