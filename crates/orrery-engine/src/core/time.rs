/// Simulation clock.
/// Accumulates simulated seconds as real seconds × time scale. The time scale
/// is not clamped: 10³–10⁷ are ordinary values for an orrery.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Simulated seconds since the epoch.
    elapsed: f64,
    paused: bool,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            paused: false,
        }
    }

    /// Start at a given simulated time.
    pub fn starting_at(elapsed: f64) -> Self {
        Self {
            elapsed,
            paused: false,
        }
    }

    /// Advance by a real frame delta. Returns the simulated delta applied.
    /// Non-finite products are dropped so one bad frame can't poison the clock.
    pub fn advance(&mut self, real_delta: f64, time_scale: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let delta = real_delta * time_scale;
        if !delta.is_finite() {
            log::warn!("dropping non-finite clock step ({real_delta} s × {time_scale})");
            return 0.0;
        }
        self.elapsed += delta;
        delta
    }

    /// Simulated seconds since the epoch.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Jump to a simulated time.
    pub fn set_elapsed(&mut self, elapsed: f64) {
        if elapsed.is_finite() {
            self.elapsed = elapsed;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_scales_real_time() {
        let mut clock = SimulationClock::new();
        let step = clock.advance(0.5, 86_400.0);
        assert_eq!(step, 43_200.0);
        assert_eq!(clock.elapsed(), 43_200.0);
    }

    #[test]
    fn huge_time_scales_are_not_clamped() {
        let mut clock = SimulationClock::new();
        clock.advance(1.0 / 60.0, 1.0e7);
        assert!((clock.elapsed() - 1.0e7 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn negative_time_scale_runs_backwards() {
        let mut clock = SimulationClock::starting_at(100.0);
        clock.advance(1.0, -40.0);
        assert_eq!(clock.elapsed(), 60.0);
    }

    #[test]
    fn paused_clock_stands_still() {
        let mut clock = SimulationClock::new();
        clock.set_paused(true);
        assert_eq!(clock.advance(1.0, 1_000.0), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
        clock.set_paused(false);
        clock.advance(1.0, 1_000.0);
        assert_eq!(clock.elapsed(), 1_000.0);
    }

    #[test]
    fn non_finite_steps_are_dropped() {
        let mut clock = SimulationClock::starting_at(5.0);
        clock.advance(f64::NAN, 10.0);
        clock.advance(1.0, f64::INFINITY);
        clock.set_elapsed(f64::NAN);
        assert_eq!(clock.elapsed(), 5.0);
    }
}
